//! Tag and anchor policy checks.

use crate::error::ValidationError;
use crate::tags::Tag;

/// Maximum number of tags on a data item.
pub const MAX_TAGS: usize = 128;

/// Maximum tag name length in bytes.
pub const MAX_TAG_NAME_LENGTH: usize = 1024;

/// Maximum tag value length in bytes.
pub const MAX_TAG_VALUE_LENGTH: usize = 3072;

/// Maximum anchor length in bytes.
pub const MAX_ANCHOR_LENGTH: usize = 32;

/// Check tag count and per-tag name and value lengths.
///
/// Reports the first violation, in list order.
pub fn validate_tags(tags: &[Tag]) -> Result<(), ValidationError> {
    if tags.len() > MAX_TAGS {
        return Err(ValidationError::TooManyTags { count: tags.len() });
    }

    for (index, tag) in tags.iter().enumerate() {
        if tag.name.is_empty() {
            return Err(ValidationError::EmptyTagName { index });
        }
        if tag.name.len() > MAX_TAG_NAME_LENGTH {
            return Err(ValidationError::TagNameTooLong {
                index,
                len: tag.name.len(),
            });
        }
        if tag.value.is_empty() {
            return Err(ValidationError::EmptyTagValue { index });
        }
        if tag.value.len() > MAX_TAG_VALUE_LENGTH {
            return Err(ValidationError::TagValueTooLong {
                index,
                len: tag.value.len(),
            });
        }
    }

    Ok(())
}

/// Check a stored anchor, which may be at most 32 bytes.
pub fn validate_anchor(anchor: &[u8]) -> Result<(), ValidationError> {
    if anchor.len() > MAX_ANCHOR_LENGTH {
        return Err(ValidationError::AnchorLength { len: anchor.len() });
    }
    Ok(())
}

/// Convert a caller-supplied anchor to the fixed 32-byte field.
pub fn anchor_field(anchor: &[u8]) -> Result<[u8; 32], ValidationError> {
    anchor
        .try_into()
        .map_err(|_| ValidationError::AnchorLength { len: anchor.len() })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(count: usize) -> Vec<Tag> {
        (0..count)
            .map(|i| Tag::new(format!("name-{i}"), "value"))
            .collect()
    }

    #[test]
    fn test_tag_count_limit() {
        assert!(validate_tags(&tags(128)).is_ok());
        assert_eq!(
            validate_tags(&tags(129)),
            Err(ValidationError::TooManyTags { count: 129 })
        );
    }

    #[test]
    fn test_tag_name_bounds() {
        assert_eq!(
            validate_tags(&[Tag::new("", "v")]),
            Err(ValidationError::EmptyTagName { index: 0 })
        );
        assert!(validate_tags(&[Tag::new(vec![b'n'; 1024], "v")]).is_ok());
        assert_eq!(
            validate_tags(&[Tag::new("ok", "v"), Tag::new(vec![b'n'; 1025], "v")]),
            Err(ValidationError::TagNameTooLong {
                index: 1,
                len: 1025
            })
        );
    }

    #[test]
    fn test_tag_value_bounds() {
        assert_eq!(
            validate_tags(&[Tag::new("n", "")]),
            Err(ValidationError::EmptyTagValue { index: 0 })
        );
        assert!(validate_tags(&[Tag::new("n", vec![b'v'; 3072])]).is_ok());
        assert_eq!(
            validate_tags(&[Tag::new("n", vec![b'v'; 3073])]),
            Err(ValidationError::TagValueTooLong { index: 0, len: 3073 })
        );
    }

    #[test]
    fn test_anchor_bounds() {
        assert!(validate_anchor(&[0u8; 32]).is_ok());
        assert!(validate_anchor(&[]).is_ok());
        assert_eq!(
            validate_anchor(&[0u8; 33]),
            Err(ValidationError::AnchorLength { len: 33 })
        );
        assert!(anchor_field(&[7u8; 32]).is_ok());
        assert_eq!(
            anchor_field(&[7u8; 16]),
            Err(ValidationError::AnchorLength { len: 16 })
        );
    }
}
