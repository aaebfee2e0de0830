use crate::domain::common::{lenient_record_id, RecordId};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Client record as returned by `/api/cliente` and its search route
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Client {
    #[serde(deserialize_with = "lenient_record_id")]
    pub id: RecordId,

    #[serde(rename = "nome", default)]
    pub name: String,

    #[serde(rename = "contato", default)]
    pub contact: Option<String>,

    #[serde(rename = "empresa", default)]
    pub company: Option<String>,

    // Company tax id
    #[serde(rename = "CNPJ", default)]
    pub cnpj: Option<String>,
}

impl Client {
    /// Suggestion line shown under the client lookup
    pub fn display_label(&self) -> String {
        match self.company.as_deref().filter(|c| !c.is_empty()) {
            Some(company) => format!("{} - {}", self.name, company),
            None => self.name.clone(),
        }
    }

    /// Copy the client's columns and foreign key into a service draft
    pub fn copy_into(&self, draft: &mut Map<String, Value>) {
        draft.insert("nome".into(), json!(self.name));
        draft.insert("contato".into(), json!(self.contact));
        draft.insert("empresa".into(), json!(self.company));
        draft.insert("CNPJ".into(), json!(self.cnpj));
        draft.insert("cliente_id".into(), json!(self.id));
    }
}
