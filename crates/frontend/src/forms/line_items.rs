//! Line-item list editing: add or merge, remove, per-row edits and totals

use super::draft::{LineItem, LineOrigin, MaterialRef};
use contracts::domain::a003_material::Material;
use contracts::shared::number::parse_int_prefix;

const PLACEHOLDER_PREFIX: &str = "pendente_";

/// Transient "add material" inputs under the line-item table
#[derive(Debug, Clone, PartialEq)]
pub struct LineItemInput {
    pub text: String,
    /// Suggestion picked from the material lookup
    pub staged: Option<Material>,
    pub quantity: u32,
}

impl Default for LineItemInput {
    fn default() -> Self {
        Self {
            text: String::new(),
            staged: None,
            quantity: 1,
        }
    }
}

/// Typed quantity; anything but a positive integer means 1
pub fn parse_quantity(raw: &str) -> u32 {
    match parse_int_prefix(raw) {
        Some(q) if q >= 1 => q.min(u32::MAX as i64) as u32,
        _ => 1,
    }
}

/// Placeholder id for a typed material, unique within `items`
pub fn placeholder_id(items: &[LineItem], now_millis: i64) -> String {
    let taken = |tag: &str| {
        items
            .iter()
            .any(|i| matches!(&i.reference, MaterialRef::Placeholder(t) if t == tag))
    };

    let base = format!("{}{}", PLACEHOLDER_PREFIX, now_millis);
    if !taken(&base) {
        return base;
    }
    let mut n = 1;
    loop {
        let tag = format!("{}_{}", base, n);
        if !taken(&tag) {
            return tag;
        }
        n += 1;
    }
}

/// Add a row for a picked material or typed text.
///
/// A picked material already present as an existing row only raises that
/// row's quantity. Returns the index of the touched row, `None` when there
/// was nothing to add.
pub fn add_or_merge(
    items: &mut Vec<LineItem>,
    staged: Option<&Material>,
    text: &str,
    quantity: u32,
    now_millis: i64,
) -> Option<usize> {
    let quantity = quantity.max(1);

    if let Some(material) = staged {
        let reference = MaterialRef::Backend(material.id);
        if let Some(idx) = items
            .iter()
            .position(|i| i.origin == LineOrigin::Existing && i.reference == reference)
        {
            items[idx].quantity = items[idx].quantity.saturating_add(quantity);
            return Some(idx);
        }

        items.push(LineItem {
            reference,
            description: material.description.clone(),
            unit_price: material.price,
            price_provisional: false,
            quantity,
            origin: LineOrigin::Existing,
        });
        return Some(items.len() - 1);
    }

    let description = text.trim();
    if description.is_empty() {
        return None;
    }

    let reference = MaterialRef::Placeholder(placeholder_id(items, now_millis));
    items.push(LineItem {
        reference,
        description: description.to_string(),
        unit_price: 0.0,
        price_provisional: true,
        quantity,
        origin: LineOrigin::Pending,
    });
    Some(items.len() - 1)
}

/// Remove the row at `idx`; out-of-range indexes are ignored
pub fn remove_at(items: &mut Vec<LineItem>, idx: usize) -> Option<LineItem> {
    (idx < items.len()).then(|| items.remove(idx))
}

pub fn set_quantity(items: &mut [LineItem], idx: usize, quantity: u32) -> bool {
    match items.get_mut(idx) {
        Some(item) => {
            item.quantity = quantity.max(1);
            true
        }
        None => false,
    }
}

/// Set a row's unit price; the price stops being provisional
pub fn set_price(items: &mut [LineItem], idx: usize, price: f64) -> bool {
    match items.get_mut(idx) {
        Some(item) => {
            item.unit_price = if price.is_finite() { price } else { 0.0 };
            item.price_provisional = false;
            true
        }
        None => false,
    }
}

/// Σ unit price × quantity
pub fn line_items_total(items: &[LineItem]) -> f64 {
    items.iter().map(LineItem::subtotal).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn material(id: i64, description: &str, price: f64) -> Material {
        Material {
            id,
            description: description.into(),
            price,
            ..Default::default()
        }
    }

    fn descriptions(items: &[LineItem]) -> Vec<&str> {
        items.iter().map(|i| i.description.as_str()).collect()
    }

    #[test]
    fn test_merge_collapses_same_material() {
        let cable = material(1, "Cabo", 5.0);
        let mut items = Vec::new();

        add_or_merge(&mut items, Some(&cable), "Cabo", 2, 0);
        let len = items.len();
        add_or_merge(&mut items, Some(&cable), "Cabo", 3, 0);

        assert_eq!(items.len(), len);
        assert_eq!(items[0].quantity, 5);
        assert_eq!(line_items_total(&items), 25.0);
    }

    #[test]
    fn test_free_text_appends_pending_row() {
        let mut items = Vec::new();
        add_or_merge(&mut items, Some(&material(1, "Cabo", 5.0)), "", 1, 0);

        let idx = add_or_merge(&mut items, None, " Conector RJ45 ", 4, 1_700_000_000_000);

        assert_eq!(idx, Some(1));
        let row = &items[1];
        assert_eq!(row.origin, LineOrigin::Pending);
        assert_eq!(row.unit_price, 0.0);
        assert!(row.price_provisional);
        assert_eq!(row.quantity, 4);
        assert_eq!(row.description, "Conector RJ45");
        assert_eq!(row.reference, MaterialRef::Placeholder("pendente_1700000000000".into()));
    }

    #[test]
    fn test_nothing_to_add_is_noop() {
        let mut items = Vec::new();
        assert_eq!(add_or_merge(&mut items, None, "   ", 2, 0), None);
        assert!(items.is_empty());
    }

    #[test]
    fn test_placeholders_stay_unique_within_one_millisecond() {
        let mut items = Vec::new();
        add_or_merge(&mut items, None, "A", 1, 42);
        add_or_merge(&mut items, None, "B", 1, 42);
        add_or_merge(&mut items, None, "C", 1, 42);
        let keys: Vec<_> = items.iter().map(|i| i.reference.key()).collect();
        assert_eq!(keys, vec!["pendente_42", "pendente_42_1", "pendente_42_2"]);
    }

    #[test]
    fn test_remove_at() {
        let mut items = Vec::new();
        for text in ["A", "B", "C"] {
            add_or_merge(&mut items, None, text, 1, 0);
        }
        assert!(remove_at(&mut items, 3).is_none());
        assert_eq!(remove_at(&mut items, 0).map(|i| i.description), Some("A".to_string()));
        assert_eq!(descriptions(&items), vec!["B", "C"]);
    }

    #[test]
    fn test_row_edits() {
        let mut items = Vec::new();
        add_or_merge(&mut items, None, "Fita", 1, 0);

        assert!(set_price(&mut items, 0, 2.5));
        assert!(!items[0].price_provisional);
        assert!(set_quantity(&mut items, 0, 0));
        assert_eq!(items[0].quantity, 1);
        assert!(set_quantity(&mut items, 0, 4));
        assert!(!set_quantity(&mut items, 5, 4));
        assert!(set_price(&mut items, 0, f64::NAN));
        assert_eq!(line_items_total(&items), 0.0);
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("3"), 3);
        assert_eq!(parse_quantity(""), 1);
        assert_eq!(parse_quantity("0"), 1);
        assert_eq!(parse_quantity("-2"), 1);
        assert_eq!(parse_quantity("abc"), 1);
    }
}
