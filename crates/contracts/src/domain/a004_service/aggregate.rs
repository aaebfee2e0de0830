use crate::domain::common::RecordId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Nested foreign key, serialized as `{"id": 7}` (or `{}` when unresolved)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
}

/// Body of `POST/PUT /api/servico`.
///
/// Line items are not part of it; they are written as `materialpedido`
/// associations once the ticket id is known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServicePayload {
    #[serde(rename = "cliente")]
    pub client: IdRef,

    #[serde(rename = "tecnico")]
    pub technician: IdRef,

    pub status: i64,

    #[serde(rename = "descricaoServico", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,

    #[serde(rename = "horaChegada", default, skip_serializing_if = "Option::is_none")]
    pub arrival_time: Option<Value>,

    #[serde(rename = "horaSaida", default, skip_serializing_if = "Option::is_none")]
    pub departure_time: Option<Value>,

    #[serde(rename = "data", default, skip_serializing_if = "Option::is_none")]
    pub date: Option<Value>,

    #[serde(rename = "kilometragem")]
    pub mileage: i64,

    #[serde(rename = "valorServico")]
    pub service_value: f64,

    #[serde(rename = "valorMateriais")]
    pub materials_value: f64,
}
