//! Loading a stored service ticket into the registration form
//!
//! The list endpoint answers the ticket with nested client/status objects and
//! full timestamps; the form works on flat fields and `HH:MM` clocks. Its
//! material associations come from a separate endpoint, usually with the
//! material nested, sometimes as flat rows.

use crate::forms::reconcile::associations_path;
use crate::shared::date_utils::{clock_hh_mm, date_part};
use crate::shared::http::{send_checked, ApiError, ApiRequest, ApiTransport};
use contracts::domain::a005_material_order::MaterialOrder;
use contracts::domain::common::record_id_from_value;
use contracts::shared::number::{value_as_f64, value_as_i64};
use serde_json::{json, Map, Value};

const CLIENT_FIELDS: [&str; 4] = ["nome", "contato", "empresa", "CNPJ"];

/// Fetch the ticket's material associations and build the form record
pub async fn load_service_for_edit<T>(transport: &T, service: &Value) -> Result<Value, ApiError>
where
    T: ApiTransport + ?Sized,
{
    let Some(id) = record_id_from_value(service.get("id")) else {
        log::warn!("Service without id opened for edit");
        return Ok(normalize_service(service, &Value::Null));
    };

    let response = send_checked(transport, ApiRequest::get(associations_path(id))).await?;
    let associations: Value = response.json()?;
    log::debug!("Loaded materials of service {}", id);
    Ok(normalize_service(service, &associations))
}

/// Flatten a stored ticket and its associations into form fields
pub fn normalize_service(service: &Value, associations: &Value) -> Value {
    let mut record = service.as_object().cloned().unwrap_or_default();
    let client = service.get("cliente");

    for name in CLIENT_FIELDS {
        let value = client
            .and_then(|c| c.get(name))
            .cloned()
            .filter(|v| !v.is_null())
            .unwrap_or_else(|| Value::String(String::new()));
        record.insert(name.to_string(), value);
    }
    if let Some(client_id) = record_id_from_value(client.and_then(|c| c.get("id"))) {
        record.insert("cliente_id".to_string(), Value::from(client_id));
    }

    if record.get("kilometragem").map_or(true, Value::is_null) {
        record.insert("kilometragem".to_string(), Value::from(0));
    }

    let date = service.get("data").and_then(Value::as_str).map(date_part).unwrap_or_default();
    record.insert("data".to_string(), Value::String(date.to_string()));
    for name in ["horaChegada", "horaSaida"] {
        let clock = service.get(name).and_then(Value::as_str).map(clock_hh_mm).unwrap_or_default();
        record.insert(name.to_string(), Value::String(clock));
    }

    record.insert("status".to_string(), status_of(service));
    record.insert("materiais".to_string(), Value::Array(line_items_of(associations)));

    Value::Object(record)
}

fn status_of(service: &Value) -> Value {
    record_id_from_value(service.get("status").and_then(|s| s.get("id")))
        .or_else(|| record_id_from_value(service.get("status_id")))
        .map(Value::from)
        .unwrap_or_else(|| Value::String(String::new()))
}

fn line_items_of(associations: &Value) -> Vec<Value> {
    let Some(rows) = associations.as_array() else {
        return Vec::new();
    };
    rows.iter().map(association_to_line_item).collect()
}

fn association_to_line_item(row: &Value) -> Value {
    match serde_json::from_value::<MaterialOrder>(row.clone()) {
        Ok(MaterialOrder {
            quantity,
            material: Some(material),
            ..
        }) => json!({
            "id": material.id,
            "descricao": material.description,
            "marca": material.brand.unwrap_or_default(),
            "preco": material.price,
            "quantidade": if quantity > 0 { quantity } else { 1 },
        }),
        _ => flat_association_to_line_item(row),
    }
}

/// Rows without a well-formed nested material
fn flat_association_to_line_item(row: &Value) -> Value {
    let material = row.get("material").filter(|m| m.is_object());
    let text = |name: &str| {
        pick(row, material, name)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    let quantity = value_as_i64(row.get("quantidade")).filter(|q| *q > 0).unwrap_or(1);
    let price = value_as_f64(pick(row, material, "preco")).unwrap_or(0.0);

    let mut item = Map::new();
    item.insert(
        "id".to_string(),
        pick(row, material, "id").cloned().unwrap_or_else(|| json!("")),
    );
    item.insert("descricao".to_string(), Value::String(text("descricao")));
    item.insert("marca".to_string(), Value::String(text("marca")));
    item.insert("preco".to_string(), Value::from(price));
    item.insert("quantidade".to_string(), Value::from(quantity));
    Value::Object(item)
}

/// Nested material first, then the flat row
fn pick<'a>(row: &'a Value, material: Option<&'a Value>, name: &str) -> Option<&'a Value> {
    material
        .and_then(|m| m.get(name))
        .filter(|v| !v.is_null())
        .or_else(|| row.get(name).filter(|v| !v.is_null()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::Draft;
    use crate::shared::http::testing::FakeTransport;
    use crate::shared::http::Method;

    fn stored_service() -> Value {
        json!({
            "id": 12,
            "cliente": {"id": 3, "nome": "Ana", "contato": "(11) 99999-0000", "empresa": null, "CNPJ": "12.345.678/0001-90"},
            "tecnico": {"id": 4, "nome": "Bruno"},
            "status": {"id": 2, "descricao": "Em andamento"},
            "kilometragem": null,
            "data": "2024-03-15T00:00:00.000Z",
            "horaChegada": "08:30:00",
            "horaSaida": "10:05:12",
            "valorServico": 150.0
        })
    }

    #[test]
    fn test_normalize_flattens_client_and_formats_dates() {
        let record = normalize_service(&stored_service(), &json!([]));

        assert_eq!(record["nome"], "Ana");
        assert_eq!(record["empresa"], "");
        assert_eq!(record["CNPJ"], "12.345.678/0001-90");
        assert_eq!(record["cliente_id"], 3);
        assert_eq!(record["kilometragem"], 0);
        assert_eq!(record["data"], "2024-03-15");
        assert_eq!(record["horaChegada"], "08:30");
        assert_eq!(record["horaSaida"], "10:05");
        assert_eq!(record["status"], 2);
        assert_eq!(record["tecnico"], json!({"id": 4, "nome": "Bruno"}));
        assert_eq!(record["valorServico"], 150.0);
    }

    #[test]
    fn test_status_falls_back_to_status_id_then_empty() {
        let record = normalize_service(&json!({"id": 1, "status_id": 3}), &Value::Null);
        assert_eq!(record["status"], 3);
        assert_eq!(record["materiais"], json!([]));

        let record = normalize_service(&json!({"id": 1}), &Value::Null);
        assert_eq!(record["status"], "");
        assert_eq!(record["data"], "");
    }

    #[test]
    fn test_associations_become_line_items() {
        let associations = json!([
            {"id": 90, "quantidade": 3, "material": {"id": 7, "descricao": "Cabo", "marca": "X", "preco": "2.5"}},
            {"id": 91, "descricao": "Fita", "marca": "Y", "preco": 4},
            {"id": 92, "quantidade": "2", "material": {"id": "8", "descricao": "Fusível", "marca": null, "preco": 1}},
            {"id": 93, "quantidade": 0, "material": {"id": 9, "descricao": null, "marca": "Z", "preco": 3}}
        ]);
        let record = normalize_service(&stored_service(), &associations);

        assert_eq!(
            record["materiais"],
            json!([
                {"id": 7, "descricao": "Cabo", "marca": "X", "preco": 2.5, "quantidade": 3},
                {"id": 91, "descricao": "Fita", "marca": "Y", "preco": 4.0, "quantidade": 1},
                {"id": 8, "descricao": "Fusível", "marca": "", "preco": 1.0, "quantidade": 2},
                {"id": 9, "descricao": "", "marca": "Z", "preco": 3.0, "quantidade": 1}
            ])
        );

        let draft = Draft::from_record(&record);
        assert_eq!(draft.line_items.len(), 4);
        assert_eq!(draft.line_items[0].reference.backend_id(), Some(7));
        assert_eq!(draft.line_items[0].quantity, 3);
    }

    #[tokio::test]
    async fn test_load_fetches_associations() {
        let transport = FakeTransport::new();
        transport.respond_json(
            Method::Get,
            "/api/materialpedido/servico/12",
            200,
            json!([{"quantidade": 2, "material": {"id": 7, "descricao": "Cabo", "marca": "X", "preco": 2.5}}]),
        );

        let record = load_service_for_edit(&transport, &stored_service()).await.unwrap();

        assert_eq!(record["materiais"][0]["quantidade"], 2);
        assert_eq!(transport.sent(Method::Get, "/api/materialpedido/servico/12").len(), 1);
    }

    #[tokio::test]
    async fn test_load_fails_on_error_status() {
        let transport = FakeTransport::new();
        transport.respond(Method::Get, "/api/materialpedido/servico/12", 500, "boom");

        let err = load_service_for_edit(&transport, &stored_service()).await.unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 500, .. }));
    }
}
