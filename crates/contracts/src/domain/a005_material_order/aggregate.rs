use crate::domain::a003_material::Material;
use crate::domain::common::{lenient_optional_id, RecordId};
use crate::shared::number::lenient_i64;
use serde::{Deserialize, Serialize};

/// Association between a service ticket and one material, with quantity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialOrder {
    #[serde(default, deserialize_with = "lenient_optional_id")]
    pub id: Option<RecordId>,

    #[serde(rename = "quantidade", default, deserialize_with = "lenient_i64")]
    pub quantity: i64,

    #[serde(default)]
    pub material: Option<Material>,
}

/// Body of `POST /api/materialpedido`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialOrderPayload {
    pub servico_id: RecordId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cliente_id: Option<RecordId>,

    pub materiais_id: RecordId,

    pub quantidade: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_wire_names() {
        let body = MaterialOrderPayload {
            servico_id: 10,
            cliente_id: Some(4),
            materiais_id: 7,
            quantidade: 2,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"servico_id": 10, "cliente_id": 4, "materiais_id": 7, "quantidade": 2})
        );
    }

    #[test]
    fn test_association_with_nested_material() {
        let a: MaterialOrder = serde_json::from_value(json!({
            "id": 5,
            "quantidade": "3",
            "material": {"id": 7, "descricao": "Cabo", "preco": 2.5}
        }))
        .unwrap();
        assert_eq!(a.quantity, 3);
        assert_eq!(a.material.map(|m| m.id), Some(7));
    }
}
