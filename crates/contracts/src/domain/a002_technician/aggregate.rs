use crate::domain::common::{lenient_record_id, RecordId};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Technician record as returned by `/api/tecnico`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Technician {
    #[serde(deserialize_with = "lenient_record_id")]
    pub id: RecordId,

    #[serde(rename = "nome", default)]
    pub name: String,

    #[serde(rename = "CPF", default)]
    pub cpf: Option<String>,

    #[serde(rename = "contato", default)]
    pub contact: Option<String>,

    // Blood type (e.g. "O+")
    #[serde(rename = "fatorRH", default)]
    pub blood_type: Option<String>,
}

impl Technician {
    pub fn display_label(&self) -> String {
        self.name.clone()
    }

    /// Service drafts keep the technician as a nested `{id, nome}` object
    pub fn copy_into(&self, draft: &mut Map<String, Value>) {
        draft.insert("tecnico".into(), json!({ "id": self.id, "nome": self.name }));
    }
}
