use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};

/// One image record as produced by the ingestion tooling.
///
/// Records are immutable once loaded; layout output lives in a separate
/// [`LayoutRect`](super::LayoutRect) so the same record can be packed at any width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub url: String,
    pub aspect_ratio: f64,
    #[serde(default)]
    pub birth_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dominant_color: Option<String>,
}

impl Item {
    /// Create an item with just the fields the layout needs.
    pub fn new(id: impl Into<String>, url: impl Into<String>, aspect_ratio: f64) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            aspect_ratio,
            birth_time: None,
            date: None,
            location: None,
            dominant_color: None,
        }
    }

    /// Create an item from pixel dimensions, limiting the ratio to 3 decimals
    /// the same way the upload tooling does.
    pub fn from_dimensions(
        id: impl Into<String>,
        url: impl Into<String>,
        width: u32,
        height: u32,
    ) -> Self {
        let aspect_ratio = if height == 0 {
            0.0
        } else {
            (width as f64 / height as f64 * 1000.0).round() / 1000.0
        };
        Self::new(id, url, aspect_ratio)
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_birth_time(mut self, birth_time: impl Into<String>) -> Self {
        self.birth_time = Some(birth_time.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Checks the layout preconditions: a finite positive aspect ratio and a url.
    pub fn validate(&self) -> Result<()> {
        if !self.aspect_ratio.is_finite() || self.aspect_ratio <= 0.0 {
            return Err(GridError::invalid_item(
                &self.id,
                format!("aspect ratio must be positive, got {}", self.aspect_ratio),
            ));
        }
        if self.url.trim().is_empty() {
            return Err(GridError::invalid_item(&self.id, "missing url"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_dimensions_rounds_ratio() {
        let item = Item::from_dimensions("a", "a.jpg", 1920, 1080);
        assert_eq!(item.aspect_ratio, 1.778);

        let broken = Item::from_dimensions("b", "b.jpg", 100, 0);
        assert!(broken.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_records() {
        assert!(Item::new("ok", "ok.jpg", 1.5).validate().is_ok());

        let err = Item::new("neg", "neg.jpg", -1.0).validate().unwrap_err();
        assert!(matches!(err, GridError::InvalidItem { ref id, .. } if id == "neg"));

        assert!(Item::new("nan", "nan.jpg", f64::NAN).validate().is_err());
        assert!(Item::new("nourl", "  ", 1.0).validate().is_err());
    }

    #[test]
    fn test_deserialize_input_record() {
        let json = r#"{
            "id": "x1",
            "url": "https://res.cloudinary.com/demo/image/upload/x1.jpg",
            "aspectRatio": 0.75,
            "birthTime": "2018-06-29T10:00:00Z",
            "date": "2018-06-29T10:00:00Z",
            "location": "Amsterdam"
        }"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.id, "x1");
        assert_eq!(item.aspect_ratio, 0.75);
        assert_eq!(item.location.as_deref(), Some("Amsterdam"));
        assert!(item.dominant_color.is_none());
    }
}
