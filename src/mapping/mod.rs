//! Bidirectional field mapping between form (Portuguese) and API (English) names
//!
//! Each entity has one table of `(ui, api)` pairs. Keys absent from the table
//! pass through unchanged in both directions.

use crate::core::entity::Data;
use crate::core::error::ValidationError;
use crate::entities::{Cobranca, Comissao, Corretor, Empreendimento, Property, Terreno};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Fields every entity carries besides its specific ones
const COMMON_FIELDS: &[&str] = &["id", "name", "status", "created_at", "updated_at"];

/// Field mapping table of one entity
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMapping {
    entity: &'static str,
    pairs: Vec<(&'static str, &'static str)>,
}

impl FieldMapping {
    pub fn new(entity: &'static str) -> Self {
        Self {
            entity,
            pairs: Vec::new(),
        }
    }

    /// Map form field `ui` to API field `api`
    pub fn field(mut self, ui: &'static str, api: &'static str) -> Self {
        self.pairs.push((ui, api));
        self
    }

    pub fn entity(&self) -> &'static str {
        self.entity
    }

    pub fn pairs(&self) -> &[(&'static str, &'static str)] {
        &self.pairs
    }

    pub fn api_name<'a>(&self, ui: &'a str) -> &'a str {
        self.pairs
            .iter()
            .find(|(u, _)| *u == ui)
            .map(|(_, api)| *api)
            .unwrap_or(ui)
    }

    pub fn ui_name<'a>(&self, api: &'a str) -> &'a str {
        self.pairs
            .iter()
            .find(|(_, a)| *a == api)
            .map(|(ui, _)| *ui)
            .unwrap_or(api)
    }

    /// Rename form keys to API keys
    pub fn to_api(&self, form: &Map<String, Value>) -> Map<String, Value> {
        form.iter()
            .map(|(key, value)| (self.api_name(key).to_string(), value.clone()))
            .collect()
    }

    /// Rename API keys to form keys
    pub fn to_ui(&self, record: &Map<String, Value>) -> Map<String, Value> {
        record
            .iter()
            .map(|(key, value)| (self.ui_name(key).to_string(), value.clone()))
            .collect()
    }

    /// Reject tables where a name appears twice on the same side
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut ui_seen = HashSet::new();
        let mut api_seen = HashSet::new();

        for (ui, api) in &self.pairs {
            if !ui_seen.insert(*ui) {
                return Err(self.conflict("ui", ui));
            }
            if !api_seen.insert(*api) {
                return Err(self.conflict("api", api));
            }
        }
        Ok(())
    }

    /// Check that every API name is a field of `T`
    pub fn validate_for<T: Data>(&self) -> Result<(), ValidationError> {
        self.validate()?;

        let unknown: Vec<_> = self
            .pairs
            .iter()
            .filter(|(_, api)| !COMMON_FIELDS.contains(api) && !T::filter_fields().contains(api))
            .map(|(ui, api)| crate::core::error::FieldValidationError {
                field: ui.to_string(),
                message: format!("'{}' is not a field of {}", api, T::resource_name_singular()),
            })
            .collect();

        if unknown.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::FieldErrors(unknown))
        }
    }

    fn conflict(&self, side: &'static str, field: &str) -> ValidationError {
        ValidationError::MappingConflict {
            entity: self.entity.to_string(),
            side,
            field: field.to_string(),
        }
    }
}

pub fn property_mapping() -> FieldMapping {
    FieldMapping::new("property")
        .field("titulo", "name")
        .field("situacao", "status")
        .field("tipo", "property_type")
        .field("endereco", "address")
        .field("bairro", "neighborhood")
        .field("cidade", "city")
        .field("estado", "state")
        .field("cep", "zip_code")
        .field("preco", "price")
        .field("area", "area")
        .field("quartos", "bedrooms")
        .field("banheiros", "bathrooms")
        .field("vagas", "parking_spaces")
        .field("caracteristicas", "features")
        .field("corretor_id", "broker_id")
}

pub fn terreno_mapping() -> FieldMapping {
    FieldMapping::new("terreno")
        .field("titulo", "name")
        .field("situacao", "status")
        .field("endereco", "address")
        .field("cidade", "city")
        .field("estado", "state")
        .field("area", "area")
        .field("preco", "price")
        .field("zoneamento", "zoning")
        .field("topografia", "topography")
        .field("caracteristicas", "features")
}

pub fn empreendimento_mapping() -> FieldMapping {
    FieldMapping::new("empreendimento")
        .field("nome", "name")
        .field("fase", "status")
        .field("construtora", "builder")
        .field("endereco", "address")
        .field("cidade", "city")
        .field("estado", "state")
        .field("total_unidades", "total_units")
        .field("unidades_vendidas", "sold_units")
        .field("preco_inicial", "price")
        .field("data_entrega", "delivery_date")
        .field("comodidades", "amenities")
}

pub fn corretor_mapping() -> FieldMapping {
    FieldMapping::new("corretor")
        .field("nome", "name")
        .field("situacao", "status")
        .field("email", "email")
        .field("telefone", "phone")
        .field("creci", "creci")
        .field("especialidades", "specialties")
        .field("regioes", "regions")
}

pub fn cobranca_mapping() -> FieldMapping {
    FieldMapping::new("cobranca")
        .field("titulo", "name")
        .field("situacao", "status")
        .field("descricao", "description")
        .field("valor", "amount")
        .field("vencimento", "due_date")
        .field("pagador", "payer")
        .field("forma_pagamento", "payment_method")
        .field("pago_em", "paid_at")
}

pub fn comissao_mapping() -> FieldMapping {
    FieldMapping::new("comissao")
        .field("nome", "name")
        .field("situacao", "status")
        .field("descricao", "description")
        .field("percentual_total", "percentual_total")
        .field("tipo_imovel", "property_type")
        .field("participantes", "participants")
}

/// Check every built-in table against its entity
pub fn validate_builtin() -> Result<(), ValidationError> {
    property_mapping().validate_for::<Property>()?;
    terreno_mapping().validate_for::<Terreno>()?;
    empreendimento_mapping().validate_for::<Empreendimento>()?;
    corretor_mapping().validate_for::<Corretor>()?;
    cobranca_mapping().validate_for::<Cobranca>()?;
    comissao_mapping().validate_for::<Comissao>()?;
    Ok(())
}
