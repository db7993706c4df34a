//! Tag list to tag mapping conversion

use crate::event::{Tag, TagMap};

/// Folds tags left to right. A key seen once maps to its value, a key seen
/// several times maps to all of its values in encounter order.
pub fn reshape_tags(tags: &[Tag]) -> TagMap {
    tags.iter().fold(TagMap::new(), |mut acc, tag| {
        acc.append(&tag.key, tag.value.clone());
        acc
    })
}
