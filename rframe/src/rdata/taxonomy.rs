//! Type mapping between semantic tags and R storage primitives

use super::types::{SemanticTag, StoragePrimitive};

/// Map a semantic tag to the storage primitive the writer declares for it
pub fn tag_to_primitive(tag: SemanticTag) -> StoragePrimitive {
    match tag {
        SemanticTag::Integer => StoragePrimitive::Integer,
        SemanticTag::Numeric => StoragePrimitive::Numeric,
        SemanticTag::Logical => StoragePrimitive::Logical,
        // Objects, dates and datetimes are serialized as text
        SemanticTag::Character | SemanticTag::Object | SemanticTag::Date | SemanticTag::DateTime => {
            StoragePrimitive::Character
        }
    }
}

/// Map every tag of a schema, keeping column order
pub fn tags_to_primitives(tags: &[SemanticTag]) -> Vec<StoragePrimitive> {
    tags.iter().copied().map(tag_to_primitive).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_table() {
        assert_eq!(tag_to_primitive(SemanticTag::Integer), StoragePrimitive::Integer);
        assert_eq!(tag_to_primitive(SemanticTag::Numeric), StoragePrimitive::Numeric);
        assert_eq!(tag_to_primitive(SemanticTag::Logical), StoragePrimitive::Logical);
        assert_eq!(tag_to_primitive(SemanticTag::Character), StoragePrimitive::Character);
        assert_eq!(tag_to_primitive(SemanticTag::Object), StoragePrimitive::Character);
        assert_eq!(tag_to_primitive(SemanticTag::Date), StoragePrimitive::Character);
        assert_eq!(tag_to_primitive(SemanticTag::DateTime), StoragePrimitive::Character);
    }

    #[test]
    fn test_order_preserved() {
        let tags = [SemanticTag::Date, SemanticTag::Integer, SemanticTag::Numeric];
        assert_eq!(
            tags_to_primitives(&tags),
            vec![StoragePrimitive::Character, StoragePrimitive::Integer, StoragePrimitive::Numeric]
        );
    }
}
