//! Field kind enumeration for registration forms

/// Related entity searched by a lookup field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupKind {
    Client,
    Technician,
    Material,
}

impl LookupKind {
    pub const ALL: [LookupKind; 3] = [Self::Client, Self::Technician, Self::Material];

    /// Backend resource segment (`/api/{resource}/search`)
    pub fn resource(&self) -> &'static str {
        match self {
            Self::Client => "cliente",
            Self::Technician => "tecnico",
            Self::Material => "material",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Technician => "technician",
            Self::Material => "material",
        }
    }
}

/// Input kind of a form field.
///
/// Closed set: every renderer and every validation rule matches on it
/// exhaustively, so a new kind fails to compile until it is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldKind {
    #[default]
    Text,
    TextArea,
    Time,
    Date,
    Number,
    StatusSelect,
    Masked {
        mask: &'static str,
    },
    /// Editable list of materials with quantity and price
    LineItemList,
    /// Read-only service value + materials total
    ComputedTotal,
    EntityLookup {
        target: LookupKind,
    },
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::TextArea => "textarea",
            Self::Time => "time",
            Self::Date => "date",
            Self::Number => "number",
            Self::StatusSelect => "status_select",
            Self::Masked { .. } => "masked_text",
            Self::LineItemList => "line_item_list",
            Self::ComputedTotal => "computed_total",
            Self::EntityLookup { .. } => "entity_lookup",
        }
    }

    /// Whether the field stores its own value under its name in the draft
    pub fn stores_value(&self) -> bool {
        !matches!(self, Self::LineItemList | Self::ComputedTotal)
    }
}
