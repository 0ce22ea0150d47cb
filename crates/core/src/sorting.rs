use std::collections::HashMap;

use crate::record::Record;

/// Sorts records by a custom key order.
///
/// Records whose key appears in `order` come first, in the order given.
/// Every other record follows, sorted alphabetically by
/// [`Record::display_name`]. Ties keep their display-name order.
pub fn sort_by_custom_order<R: Record>(records: &mut [R], order: &[String]) {
    let positions: HashMap<&str, usize> = order
        .iter()
        .enumerate()
        .map(|(index, key)| (key.as_str(), index))
        .collect();

    records.sort_by_cached_key(|record| {
        let position = positions
            .get(record.key().to_string().as_str())
            .copied()
            .unwrap_or(usize::MAX);
        (position, record.display_name())
    });
}
