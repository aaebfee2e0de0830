//! Registration form schemas for every entity page

use crate::shared::metadata::mask::{CNPJ_MASK, CPF_MASK, PHONE_MASK};
use crate::shared::metadata::{FieldKind, FieldSpec, LookupKind};

/// Static description of one registration form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormSpec {
    pub title: &'static str,
    /// Backend resource (`/api/{endpoint}`)
    pub endpoint: &'static str,
    pub fields: &'static [FieldSpec],
    /// Offers a CSV/XLSX bulk-import input next to the fields
    pub accepts_upload: bool,
}

impl FormSpec {
    /// Entity name used in status messages ("Cadastro de Serviço" -> "Serviço")
    pub fn entity_name(&self) -> &'static str {
        self.title.strip_prefix("Cadastro de ").unwrap_or(self.title)
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn has_line_items(&self) -> bool {
        self.fields.iter().any(|f| f.kind == FieldKind::LineItemList)
    }
}

const PHONE: FieldKind = FieldKind::Masked { mask: PHONE_MASK };
const CNPJ: FieldKind = FieldKind::Masked { mask: CNPJ_MASK };
const CPF: FieldKind = FieldKind::Masked { mask: CPF_MASK };

pub const CLIENT_FORM: FormSpec = FormSpec {
    title: "Cadastro de Clientes",
    endpoint: "cliente",
    fields: &[
        FieldSpec::text("nome", "Nome").required(),
        FieldSpec::new("contato", "Contato", PHONE),
        FieldSpec::text("empresa", "Empresa"),
        FieldSpec::new("CNPJ", "CNPJ", CNPJ).required(),
    ],
    accepts_upload: false,
};

pub const TECHNICIAN_FORM: FormSpec = FormSpec {
    title: "Cadastro de Técnico",
    endpoint: "tecnico",
    fields: &[
        FieldSpec::text("nome", "Nome").required(),
        FieldSpec::new("CPF", "CPF", CPF).required(),
        FieldSpec::new("contato", "Contato", PHONE),
        FieldSpec::text("fatorRH", "Fator RH"),
    ],
    accepts_upload: false,
};

pub const MATERIAL_FORM: FormSpec = FormSpec {
    title: "Cadastro de Materiais",
    endpoint: "material",
    fields: &[
        FieldSpec::text("descricao", "Descrição").required(),
        FieldSpec::text("marca", "Marca"),
        FieldSpec::new("preco", "Preço", FieldKind::Number).required(),
    ],
    accepts_upload: true,
};

pub const SERVICE_FORM: FormSpec = FormSpec {
    title: "Cadastro de Serviço",
    endpoint: "servico",
    fields: &[
        FieldSpec::new(
            "tecnico",
            "Técnico",
            FieldKind::EntityLookup {
                target: LookupKind::Technician,
            },
        )
        .required(),
        FieldSpec::new(
            "nome",
            "Cliente",
            FieldKind::EntityLookup {
                target: LookupKind::Client,
            },
        )
        .required(),
        FieldSpec::new("contato", "Contato", PHONE),
        FieldSpec::text("empresa", "Empresa"),
        FieldSpec::new("CNPJ", "CNPJ", CNPJ),
        FieldSpec::new("descricaoServico", "Descrição", FieldKind::TextArea),
        FieldSpec::new("horaChegada", "Chegada", FieldKind::Time),
        FieldSpec::new("horaSaida", "Saida", FieldKind::Time),
        FieldSpec::new("data", "Data", FieldKind::Date),
        FieldSpec::new("kilometragem", "Kilometragem", FieldKind::Number),
        FieldSpec::new("status", "Status", FieldKind::StatusSelect),
        FieldSpec::new("materiais", "Materiais", FieldKind::LineItemList),
        FieldSpec::new("valorServico", "Valor do Serviço", FieldKind::Number),
        FieldSpec::new("total", "Total", FieldKind::ComputedTotal),
    ],
    accepts_upload: false,
};

pub const ALL_FORMS: [FormSpec; 4] = [CLIENT_FORM, TECHNICIAN_FORM, MATERIAL_FORM, SERVICE_FORM];
