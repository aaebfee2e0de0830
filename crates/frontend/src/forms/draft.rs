//! Draft of one record being created or edited

use contracts::domain::common::RecordId;
use contracts::shared::number::{value_as_f64, value_as_i64};
use serde_json::{Map, Value};

/// Draft key holding a service ticket's materials
pub const LINE_ITEMS_FIELD: &str = "materiais";

/// Material behind a line item
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MaterialRef {
    /// Existing backend material
    Backend(RecordId),
    /// Local id of a typed material that has no backend record yet.
    /// Never sent as a foreign key.
    Placeholder(String),
}

impl MaterialRef {
    pub fn backend_id(&self) -> Option<RecordId> {
        match self {
            Self::Backend(id) => Some(*id),
            Self::Placeholder(_) => None,
        }
    }

    /// Backend id or local tag, for logs
    pub fn key(&self) -> String {
        match self {
            Self::Backend(id) => id.to_string(),
            Self::Placeholder(tag) => tag.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOrigin {
    Existing,
    Pending,
}

/// One material row of a service ticket
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub reference: MaterialRef,
    pub description: String,
    pub unit_price: f64,
    /// Price still to be typed by the user
    pub price_provisional: bool,
    pub quantity: u32,
    pub origin: LineOrigin,
}

impl LineItem {
    pub fn subtotal(&self) -> f64 {
        let price = if self.unit_price.is_finite() { self.unit_price } else { 0.0 };
        price * self.quantity as f64
    }

    pub fn is_pending(&self) -> bool {
        self.origin == LineOrigin::Pending
    }

    /// Owned copy of a `materiais` entry of a stored record
    pub fn from_record_value(value: &Value) -> Self {
        let id = value.get("id");
        let reference = match (value_as_i64(id), id) {
            (Some(id), _) => MaterialRef::Backend(id),
            (None, Some(Value::String(tag))) => MaterialRef::Placeholder(tag.clone()),
            (None, _) => MaterialRef::Placeholder(String::new()),
        };
        let quantity = value_as_i64(value.get("quantidade")).unwrap_or(1).clamp(1, u32::MAX as i64) as u32;

        Self {
            reference,
            description: value
                .get("descricao")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            unit_price: value_as_f64(value.get("preco")).unwrap_or(0.0),
            price_provisional: false,
            quantity,
            origin: LineOrigin::Existing,
        }
    }
}

/// Field values plus the ordered line items
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Draft {
    pub fields: Map<String, Value>,
    pub line_items: Vec<LineItem>,
}

fn collapse_by_material(rows: impl Iterator<Item = LineItem>) -> Vec<LineItem> {
    let mut items: Vec<LineItem> = Vec::new();
    for row in rows {
        let first = row
            .reference
            .backend_id()
            .and_then(|id| items.iter().position(|i| i.reference.backend_id() == Some(id)));
        match first {
            Some(idx) => items[idx].quantity = items[idx].quantity.saturating_add(row.quantity),
            None => items.push(row),
        }
    }
    items
}

impl Draft {
    /// Seed from a stored record. Line items are rebuilt as owned rows so the
    /// draft never shares state with the record it came from; rows of the same
    /// backend material collapse into the first one with summed quantities.
    pub fn from_record(record: &Value) -> Self {
        let Some(object) = record.as_object() else {
            return Self::default();
        };

        let mut fields = object.clone();
        let line_items = match fields.remove(LINE_ITEMS_FIELD) {
            Some(Value::Array(items)) => collapse_by_material(items.iter().map(LineItem::from_record_value)),
            _ => Vec::new(),
        };

        Self { fields, line_items }
    }

    /// Overwrite one field; an empty name is ignored
    pub fn set(&mut self, name: &str, value: Value) -> bool {
        if name.is_empty() {
            return false;
        }
        self.fields.insert(name.to_string(), value);
        true
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Field as input text: strings verbatim, numbers formatted, anything else empty
    pub fn text(&self, name: &str) -> String {
        match self.fields.get(name) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => String::new(),
        }
    }

    /// `name` inside a nested object field (`tecnico.nome`)
    pub fn nested_text(&self, field: &str, key: &str) -> String {
        self.fields
            .get(field)
            .and_then(|v| v.get(key))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }

    pub fn record_id(&self, name: &str) -> Option<RecordId> {
        value_as_i64(self.fields.get(name))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.line_items.is_empty()
    }
}
