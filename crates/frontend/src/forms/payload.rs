//! Draft → request body, one shape per endpoint kind

use super::draft::Draft;
use super::line_items::line_items_total;
use contracts::domain::a003_material::MaterialPayload;
use contracts::domain::a004_service::{IdRef, ServicePayload};
use contracts::shared::number::{value_as_f64, value_as_i64};
use contracts::shared::status::DEFAULT_STATUS_ID;
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointKind {
    Service,
    Material,
    Generic,
}

impl EndpointKind {
    /// Kind of a backend resource; the last path segment decides
    pub fn from_endpoint(endpoint: &str) -> Self {
        match endpoint.trim_end_matches('/').rsplit('/').next().unwrap_or_default() {
            "servico" => Self::Service,
            "material" => Self::Material,
            _ => Self::Generic,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Service(ServicePayload),
    Material(MaterialPayload),
    /// Draft fields sent as they are
    Generic(Map<String, Value>),
}

pub fn build_payload(kind: EndpointKind, draft: &Draft) -> Payload {
    match kind {
        EndpointKind::Service => Payload::Service(service_payload(draft)),
        EndpointKind::Material => Payload::Material(material_payload(draft)),
        EndpointKind::Generic => Payload::Generic(draft.fields.clone()),
    }
}

/// Service value plus the materials total
pub fn grand_total(draft: &Draft) -> f64 {
    value_as_f64(draft.get("valorServico")).unwrap_or(0.0) + line_items_total(&draft.line_items)
}

fn service_payload(draft: &Draft) -> ServicePayload {
    let technician_id = draft.get("tecnico").and_then(|t| value_as_i64(t.get("id")));
    let status = value_as_i64(draft.get("status"))
        .filter(|s| *s != 0)
        .unwrap_or(DEFAULT_STATUS_ID);

    ServicePayload {
        client: IdRef {
            id: draft.record_id("cliente_id"),
        },
        technician: IdRef { id: technician_id },
        status,
        description: draft.get("descricaoServico").cloned(),
        arrival_time: draft.get("horaChegada").cloned(),
        departure_time: draft.get("horaSaida").cloned(),
        date: draft.get("data").cloned(),
        mileage: value_as_i64(draft.get("kilometragem")).unwrap_or(0),
        service_value: value_as_f64(draft.get("valorServico")).unwrap_or(0.0),
        materials_value: line_items_total(&draft.line_items),
    }
}

fn material_payload(draft: &Draft) -> MaterialPayload {
    MaterialPayload::new(
        draft.text("descricao"),
        draft.text("marca"),
        value_as_f64(draft.get("preco")).unwrap_or(0.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::line_items::add_or_merge;
    use serde_json::json;

    fn to_json(payload: &Payload) -> Value {
        serde_json::to_value(payload).unwrap()
    }

    #[test]
    fn test_endpoint_kinds() {
        assert_eq!(EndpointKind::from_endpoint("servico"), EndpointKind::Service);
        assert_eq!(EndpointKind::from_endpoint("/api/material"), EndpointKind::Material);
        assert_eq!(EndpointKind::from_endpoint("materialpedido"), EndpointKind::Generic);
        assert_eq!(EndpointKind::from_endpoint("cliente"), EndpointKind::Generic);
    }

    #[test]
    fn test_material_completeness() {
        let draft = Draft::from_record(&json!({"descricao": "Cabo HDMI", "marca": "", "preco": 0}));
        assert_eq!(
            to_json(&build_payload(EndpointKind::Material, &draft)),
            json!({"descricao": "Cabo HDMI", "marca": "", "preco": 0.0, "incompleto": true})
        );

        let draft = Draft::from_record(&json!({"descricao": "Cabo", "marca": "X", "preco": "10"}));
        let Payload::Material(body) = build_payload(EndpointKind::Material, &draft) else {
            panic!("material payload expected");
        };
        assert!(!body.incomplete);
        assert_eq!(body.price, 10.0);
    }

    #[test]
    fn test_service_defaults() {
        let draft = Draft::from_record(&json!({"status": "", "kilometragem": "abc"}));
        assert_eq!(
            to_json(&build_payload(EndpointKind::Service, &draft)),
            json!({
                "cliente": {},
                "tecnico": {},
                "status": 1,
                "kilometragem": 0,
                "valorServico": 0.0,
                "valorMateriais": 0.0
            })
        );
    }

    #[test]
    fn test_service_payload_from_edited_draft() {
        let mut draft = Draft::from_record(&json!({
            "cliente_id": 4,
            "tecnico": {"id": 2, "nome": "Rui"},
            "status": 3,
            "descricaoServico": "Instalação",
            "horaChegada": "08:00",
            "horaSaida": "10:30",
            "data": "2024-05-02",
            "kilometragem": "12.7",
            "valorServico": "150.5",
            "materiais": [{"id": 7, "descricao": "Cabo", "preco": 5, "quantidade": 2}]
        }));
        add_or_merge(&mut draft.line_items, None, "Fita", 1, 0);

        let body = to_json(&build_payload(EndpointKind::Service, &draft));
        assert_eq!(
            body,
            json!({
                "cliente": {"id": 4},
                "tecnico": {"id": 2},
                "status": 3,
                "descricaoServico": "Instalação",
                "horaChegada": "08:00",
                "horaSaida": "10:30",
                "data": "2024-05-02",
                "kilometragem": 12,
                "valorServico": 150.5,
                "valorMateriais": 10.0
            })
        );
        assert!(body.get("materiais").is_none());
        assert_eq!(grand_total(&draft), 160.5);
    }

    #[test]
    fn test_generic_payload_is_verbatim() {
        let record = json!({"nome": "Ana", "contato": "(53) 99999-0000", "CNPJ": "12.345.678/0001-90"});
        let draft = Draft::from_record(&record);
        assert_eq!(to_json(&build_payload(EndpointKind::Generic, &draft)), record);
    }
}
