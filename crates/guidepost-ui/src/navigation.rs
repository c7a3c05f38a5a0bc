//! Screen routes.
//!
//! The detail route carries a whole [`AnalysisResult`] so the detail screen
//! can render before its first refresh completes. Each field is one path
//! segment, percent-encoded:
//!
//! - required text: the encoded value
//! - optional text: empty when absent, `=` + encoded value when present
//! - optional list: empty when absent, `=` followed by `,` + encoded item for
//!   each item (`=` alone is an empty list)
//! - status: upper-case name
//!
//! Decoding also accepts `+` for a space.

use std::string::FromUtf8Error;

use guidepost_core::{AnalysisResult, AnalysisStatus};
use thiserror::Error;

const DETAIL_PREFIX: &str = "image_detail";
const DETAIL_SEGMENTS: usize = 9;
const PRESENT: char = '=';
const ITEM: char = ',';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    ImageDetail,
    Upload,
}

impl Screen {
    /// Route pattern, with `{placeholders}` for arguments.
    pub fn route(self) -> &'static str {
        match self {
            Screen::Home => "home",
            Screen::ImageDetail => {
                "image_detail/{imageId}/{filename}/{analyzedAt}/{status}/{description}/{keywords}/{detectedText}/{error}"
            }
            Screen::Upload => "upload",
        }
    }

    /// Screen a concrete route belongs to.
    pub fn for_route(route: &str) -> Option<Screen> {
        match route.split('/').next()? {
            "home" => Some(Screen::Home),
            DETAIL_PREFIX => Some(Screen::ImageDetail),
            "upload" => Some(Screen::Upload),
            _ => None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("Not an image detail route: {0}")]
    WrongPrefix(String),

    #[error("Expected {expected} route segments, found {found}")]
    SegmentCount { expected: usize, found: usize },

    #[error("Invalid encoding in {field}: {source}")]
    InvalidEncoding {
        field: &'static str,
        #[source]
        source: FromUtf8Error,
    },

    #[error("Malformed {field} segment: {segment}")]
    MalformedField {
        field: &'static str,
        segment: String,
    },
}

fn encode_text(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

fn encode_optional(value: Option<&str>) -> String {
    match value {
        Some(v) => format!("{}{}", PRESENT, encode_text(v)),
        None => String::new(),
    }
}

fn encode_list(values: Option<&[String]>) -> String {
    let Some(values) = values else {
        return String::new();
    };
    let mut segment = PRESENT.to_string();
    for value in values {
        segment.push(ITEM);
        segment.push_str(&encode_text(value));
    }
    segment
}

/// Concrete detail route for `result`.
pub fn encode_detail_route(result: &AnalysisResult) -> String {
    let segments = [
        DETAIL_PREFIX.to_string(),
        encode_text(&result.image_id),
        encode_text(&result.filename),
        encode_optional(result.analyzed_at.as_deref()),
        result.status.as_route_name().to_string(),
        encode_optional(result.description.as_deref()),
        encode_list(result.keywords.as_deref()),
        encode_list(result.detected_text.as_deref()),
        encode_optional(result.error.as_deref()),
    ];
    segments.join("/")
}

fn decode_text(field: &'static str, segment: &str) -> Result<String, RouteError> {
    let spaced = segment.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|decoded| decoded.into_owned())
        .map_err(|source| RouteError::InvalidEncoding { field, source })
}

/// Payload after the presence marker, `None` for an empty segment.
fn present_payload<'a>(field: &'static str, segment: &'a str) -> Result<Option<&'a str>, RouteError> {
    if segment.is_empty() {
        return Ok(None);
    }
    segment
        .strip_prefix(PRESENT)
        .map(Some)
        .ok_or_else(|| RouteError::MalformedField {
            field,
            segment: segment.to_string(),
        })
}

fn decode_optional(field: &'static str, segment: &str) -> Result<Option<String>, RouteError> {
    present_payload(field, segment)?
        .map(|payload| decode_text(field, payload))
        .transpose()
}

fn decode_list(field: &'static str, segment: &str) -> Result<Option<Vec<String>>, RouteError> {
    let Some(payload) = present_payload(field, segment)? else {
        return Ok(None);
    };
    if payload.is_empty() {
        return Ok(Some(Vec::new()));
    }
    let items = payload
        .strip_prefix(ITEM)
        .ok_or_else(|| RouteError::MalformedField {
            field,
            segment: segment.to_string(),
        })?;
    items
        .split(ITEM)
        .map(|item| decode_text(field, item))
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

/// Rebuild the [`AnalysisResult`] carried by a detail route.
pub fn decode_detail_route(route: &str) -> Result<AnalysisResult, RouteError> {
    let segments: Vec<&str> = route.split('/').collect();
    if segments[0] != DETAIL_PREFIX {
        return Err(RouteError::WrongPrefix(route.to_string()));
    }
    if segments.len() != DETAIL_SEGMENTS {
        return Err(RouteError::SegmentCount {
            expected: DETAIL_SEGMENTS,
            found: segments.len(),
        });
    }

    Ok(AnalysisResult {
        image_id: decode_text("imageId", segments[1])?,
        filename: decode_text("filename", segments[2])?,
        analyzed_at: decode_optional("analyzedAt", segments[3])?,
        status: AnalysisStatus::from_route_name(segments[4]),
        description: decode_optional("description", segments[5])?,
        keywords: decode_list("keywords", segments[6])?,
        detected_text: decode_list("detectedText", segments[7])?,
        error: decode_optional("error", segments[8])?,
    })
}
