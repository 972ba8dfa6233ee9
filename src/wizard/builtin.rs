//! Registration wizards of the dashboard

use super::Wizard;
use crate::core::field::FieldFormat;
use crate::core::validation::{FormValidationConfig, filters, validators};
use crate::entities::{ActiveStatus, DevelopmentStatus, ListingStatus};
use crate::mapping::{corretor_mapping, empreendimento_mapping, property_mapping};

fn wire_values(values: impl Iterator<Item = &'static str>) -> Vec<String> {
    values.map(str::to_string).collect()
}

/// Property registration: basic data, location, characteristics, price
pub fn property_wizard() -> Wizard {
    Wizard::new("property")
        .step(
            "Dados básicos",
            FormValidationConfig::new("property_basics")
                .filter("titulo", filters::trim())
                .validator("titulo", validators::required())
                .validator("titulo", validators::string_length(3, 120))
                .validator("tipo", validators::required())
                .filter("situacao", filters::trim())
                .validator(
                    "situacao",
                    validators::in_list(wire_values(ListingStatus::ALL.iter().map(|s| s.as_str()))),
                ),
        )
        .step(
            "Localização",
            FormValidationConfig::new("property_location")
                .filter("endereco", filters::trim())
                .validator("endereco", validators::required())
                .validator("bairro", validators::required())
                .validator("cidade", validators::required())
                .filter("estado", filters::uppercase())
                .validator("estado", validators::required())
                .validator("estado", validators::string_length(2, 2))
                .filter("cep", filters::digits_only())
                .validator("cep", validators::format(FieldFormat::Cep)),
        )
        .step(
            "Características",
            FormValidationConfig::new("property_features")
                .filter("area", filters::parse_number())
                .validator("area", validators::required())
                .validator("area", validators::positive())
                .validator("quartos", validators::number_between(0.0, 50.0))
                .validator("banheiros", validators::number_between(0.0, 50.0))
                .validator("vagas", validators::number_between(0.0, 50.0)),
        )
        .step(
            "Valores",
            FormValidationConfig::new("property_price")
                .filter("preco", filters::parse_number())
                .filter("preco", filters::round_decimals(2))
                .validator("preco", validators::required())
                .validator("preco", validators::positive()),
        )
        .with_mapping(property_mapping())
}

/// Development registration: identification, units, delivery
pub fn development_wizard() -> Wizard {
    Wizard::new("empreendimento")
        .step(
            "Identificação",
            FormValidationConfig::new("development_basics")
                .filter("nome", filters::trim())
                .validator("nome", validators::required())
                .filter("construtora", filters::trim())
                .validator("construtora", validators::required())
                .validator(
                    "fase",
                    validators::in_list(wire_values(
                        DevelopmentStatus::ALL.iter().map(|s| s.as_str()),
                    )),
                ),
        )
        .step(
            "Localização",
            FormValidationConfig::new("development_location")
                .validator("endereco", validators::required())
                .validator("cidade", validators::required())
                .filter("estado", filters::uppercase())
                .validator("estado", validators::string_length(2, 2)),
        )
        .step(
            "Unidades",
            FormValidationConfig::new("development_units")
                .validator("total_unidades", validators::required())
                .validator("total_unidades", validators::positive())
                .validator("unidades_vendidas", validators::number_between(0.0, 100_000.0))
                .filter("preco_inicial", filters::parse_number())
                .validator("preco_inicial", validators::positive())
                .validator("data_entrega", validators::date_format("%Y-%m-%d")),
        )
        .with_mapping(empreendimento_mapping())
}

/// Broker registration: personal data, contact, regions
pub fn broker_wizard() -> Wizard {
    Wizard::new("corretor")
        .step(
            "Dados pessoais",
            FormValidationConfig::new("broker_basics")
                .filter("nome", filters::trim())
                .validator("nome", validators::required())
                .filter("creci", filters::uppercase())
                .validator("creci", validators::required())
                .validator("creci", validators::format(FieldFormat::Creci))
                .validator(
                    "situacao",
                    validators::in_list(wire_values(ActiveStatus::ALL.iter().map(|s| s.as_str()))),
                ),
        )
        .step(
            "Contato",
            FormValidationConfig::new("broker_contact")
                .filter("email", filters::trim())
                .filter("email", filters::lowercase())
                .validator("email", validators::required())
                .validator("email", validators::format(FieldFormat::Email))
                .validator("telefone", validators::required())
                .validator("telefone", validators::format(FieldFormat::Phone)),
        )
        .step(
            "Atuação",
            FormValidationConfig::new("broker_regions")
                .validator("regioes", validators::required()),
        )
        .with_mapping(corretor_mapping())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_property_wizard_full_flow() {
        let mut wizard = property_wizard();
        assert_eq!(wizard.len(), 4);

        wizard.set_value("titulo", json!("Casa no Batel"));
        wizard.set_value("tipo", json!("casa"));
        wizard.set_value("situacao", json!("available"));
        wizard.next().unwrap();

        wizard.set_value("endereco", json!("Rua Gutemberg, 100"));
        wizard.set_value("bairro", json!("Batel"));
        wizard.set_value("cidade", json!("Curitiba"));
        wizard.set_value("estado", json!("pr"));
        wizard.set_value("cep", json!("80420-030"));
        wizard.next().unwrap();

        wizard.set_value("area", json!("180"));
        wizard.set_value("quartos", json!(3));
        wizard.next().unwrap();

        wizard.set_value("preco", json!("R$ 1.250.000,00"));
        let form = wizard.submit().unwrap();

        assert_eq!(form["name"], json!("Casa no Batel"));
        assert_eq!(form["state"], json!("PR"));
        assert_eq!(form["zip_code"], json!("80420030"));
        assert_eq!(form["area"], json!(180.0));
        assert_eq!(form["price"], json!(1250000.0));
        assert_eq!(form["status"], json!("available"));
    }

    #[test]
    fn test_property_wizard_rejects_unknown_status() {
        let mut wizard = property_wizard();
        wizard.set_value("titulo", json!("Casa"));
        wizard.set_value("tipo", json!("casa"));
        wizard.set_value("situacao", json!("vendido"));

        let err = wizard.next().unwrap_err();
        assert_eq!(err.fields(), vec!["situacao"]);
    }

    #[test]
    fn test_broker_wizard_contact_step_guards() {
        let mut wizard = broker_wizard();
        wizard.set_value("nome", json!("Maria Silva"));
        wizard.set_value("creci", json!("12345-f"));
        wizard.set_value("situacao", json!("active"));
        wizard.next().unwrap();

        wizard.set_value("email", json!("not-an-email"));
        wizard.set_value("telefone", json!("(41) 99999-0000"));
        let err = wizard.next().unwrap_err();
        assert_eq!(err.fields(), vec!["email"]);

        wizard.set_value("email", json!(" Maria@Imob.com.br "));
        assert_eq!(wizard.next().unwrap(), 2);
        assert_eq!(wizard.values()["email"], json!("maria@imob.com.br"));
    }

    #[test]
    fn test_development_wizard_maps_units() {
        let mut wizard = development_wizard();
        wizard.set_value("nome", json!("Residencial Araucária"));
        wizard.set_value("construtora", json!("Construtora Pinheiro"));
        wizard.set_value("fase", json!("launch"));
        wizard.set_value("endereco", json!("Av. das Torres, 500"));
        wizard.set_value("cidade", json!("São José dos Pinhais"));
        wizard.set_value("estado", json!("pr"));
        wizard.set_value("total_unidades", json!(80));
        wizard.set_value("unidades_vendidas", json!(20));
        wizard.set_value("data_entrega", json!("2026-12-01"));

        assert_eq!(wizard.go_to(2).unwrap(), 2);
        let form = wizard.submit().unwrap();
        assert_eq!(form["total_units"], json!(80));
        assert_eq!(form["sold_units"], json!(20));
        assert_eq!(form["delivery_date"], json!("2026-12-01"));
    }
}
