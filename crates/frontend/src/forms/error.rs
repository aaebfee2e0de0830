use contracts::shared::metadata::required_message;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    #[error("{}", required_message(label))]
    Validation {
        field: &'static str,
        label: &'static str,
    },

    #[error("Erro ao salvar: {0}")]
    Save(String),

    #[error("Erro ao importar arquivo: {0}")]
    Upload(String),

    #[error("Aguarde o envio em andamento")]
    InFlight,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = FormError::Validation {
            field: "nome",
            label: "Nome",
        };
        assert_eq!(err.to_string(), "O campo \"Nome\" é obrigatório!");
        assert_eq!(
            FormError::Save("CNPJ duplicado".into()).to_string(),
            "Erro ao salvar: CNPJ duplicado"
        );
    }
}
