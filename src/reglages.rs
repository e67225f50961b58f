// src/reglages.rs

//! Réglages : instantanés en lecture seule, tirés du magasin de réglages.
//!
//! Le magasin parle en clés camelCase (`displayCommas`, `localCurrencyCode`…).
//! On les lit depuis du TOML, on valide, puis on découpe en deux instantanés :
//! un pour la transformation, un pour l’affichage.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::format::{Item, StrftimeItems};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::noyau::format::{Notation, OptionsNotation};

/// Date seule (ex: 1/30/2021).
pub const FORMAT_DATE: &str = "%-m/%-d/%Y";

/// Date + heure (ex: 1/30/2021, 10:10:00 AM).
pub const FORMAT_DATE_HEURE: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// Garde-fou : au-delà, le rendu rationnel devient coûteux pour rien.
pub const PRECISION_MAX: usize = 100;

#[derive(Debug, Error)]
pub enum ErreurReglages {
    #[error("lecture impossible de {chemin}: {source}")]
    Lecture {
        chemin: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("réglages TOML invalides: {0}")]
    Syntaxe(#[from] toml::de::Error),

    #[error("précision {precision} hors bornes (max {max})")]
    PrecisionHorsBornes { precision: usize, max: usize },

    #[error("bornes d’exposant incohérentes: inf={inf} > sup={sup}")]
    BornesExposant { inf: i32, sup: i32 },

    #[error("séparateur décimal vide")]
    SeparateurDecimalVide,

    #[error("le symbole de groupement {0:?} est aussi le séparateur décimal")]
    SeparateursIdentiques(String),

    #[error("code devise {0:?} invalide (3 lettres majuscules attendues)")]
    CodeDevise(String),

    #[error("symbole devise vide alors que la conversion est active")]
    SymboleDeviseVide,

    #[error("motif de date {0:?} invalide")]
    MotifDate(String),
}

/* ------------------------ Magasin (clés plates) ------------------------ */

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Reglages {
    #[serde(rename = "displayCommas")]
    pub afficher_groupes: bool,
    #[serde(rename = "digitGroupingSymbol")]
    pub symbole_groupement: String,
    #[serde(rename = "decimalSeparator")]
    pub separateur_decimal: String,
    #[serde(rename = "trimTrailingZeros")]
    pub suppr_zeros_finaux: bool,

    pub precision: Option<usize>,
    #[serde(rename = "lowerExponentBound")]
    pub borne_exposant_inf: i32,
    #[serde(rename = "upperExponentBound")]
    pub borne_exposant_sup: i32,
    pub notation: Notation,

    #[serde(rename = "convertLocalCurrency")]
    pub convertir_devise_locale: bool,
    #[serde(rename = "localCurrencyCode")]
    pub code_devise_locale: String,
    #[serde(rename = "localCurrencySymbol")]
    pub symbole_devise_locale: String,

    #[serde(rename = "temperatureShortcut")]
    pub raccourci_temperature: bool,

    #[serde(rename = "formatDate")]
    pub format_date: String,
    #[serde(rename = "formatDateTime")]
    pub format_date_heure: String,
}

impl Default for Reglages {
    fn default() -> Self {
        let options = OptionsNotation::default();
        Self {
            afficher_groupes: true,
            symbole_groupement: ",".into(),
            separateur_decimal: ".".into(),
            suppr_zeros_finaux: false,
            precision: options.precision,
            borne_exposant_inf: options.borne_inf,
            borne_exposant_sup: options.borne_sup,
            notation: options.notation,
            convertir_devise_locale: false,
            code_devise_locale: "USD".into(),
            symbole_devise_locale: "$".into(),
            raccourci_temperature: false,
            format_date: FORMAT_DATE.into(),
            format_date_heure: FORMAT_DATE_HEURE.into(),
        }
    }
}

fn motif_date_valide(motif: &str) -> bool {
    !StrftimeItems::new(motif).any(|item| matches!(item, Item::Error))
}

impl Reglages {
    /// Lit un instantané TOML (clés absentes = valeurs par défaut) puis valide.
    pub fn depuis_toml(texte: &str) -> Result<Self, ErreurReglages> {
        let reglages: Reglages = toml::from_str(texte)?;
        reglages.valider()?;
        debug!(?reglages, "réglages chargés");
        Ok(reglages)
    }

    pub fn charger(chemin: impl AsRef<Path>) -> Result<Self, ErreurReglages> {
        let chemin = chemin.as_ref();
        let texte = fs::read_to_string(chemin).map_err(|source| ErreurReglages::Lecture {
            chemin: chemin.to_path_buf(),
            source,
        })?;
        Self::depuis_toml(&texte)
    }

    pub fn valider(&self) -> Result<(), ErreurReglages> {
        if let Some(precision) = self.precision {
            if precision > PRECISION_MAX {
                return Err(ErreurReglages::PrecisionHorsBornes {
                    precision,
                    max: PRECISION_MAX,
                });
            }
        }

        if self.borne_exposant_inf > self.borne_exposant_sup {
            return Err(ErreurReglages::BornesExposant {
                inf: self.borne_exposant_inf,
                sup: self.borne_exposant_sup,
            });
        }

        if self.separateur_decimal.is_empty() {
            return Err(ErreurReglages::SeparateurDecimalVide);
        }
        if self.symbole_groupement == self.separateur_decimal {
            return Err(ErreurReglages::SeparateursIdentiques(
                self.symbole_groupement.clone(),
            ));
        }

        let code = &self.code_devise_locale;
        if code.len() != 3 || !code.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(ErreurReglages::CodeDevise(code.clone()));
        }
        if self.convertir_devise_locale && self.symbole_devise_locale.is_empty() {
            return Err(ErreurReglages::SymboleDeviseVide);
        }

        for motif in [&self.format_date, &self.format_date_heure] {
            if !motif_date_valide(motif) {
                return Err(ErreurReglages::MotifDate(motif.clone()));
            }
        }

        Ok(())
    }

    /// Instantané pour la transformation d’entrée.
    pub fn transformation(&self) -> ReglagesTransformation {
        ReglagesTransformation {
            convertir_devise_locale: self.convertir_devise_locale,
            code_devise_locale: self.code_devise_locale.clone(),
            symbole_devise_locale: self.symbole_devise_locale.clone(),
            raccourci_temperature: self.raccourci_temperature,
        }
    }

    /// Instantané pour l’affichage des résultats.
    pub fn format(&self) -> ReglagesFormat {
        ReglagesFormat {
            afficher_groupes: self.afficher_groupes,
            symbole_groupement: self.symbole_groupement.clone(),
            separateur_decimal: self.separateur_decimal.clone(),
            suppr_zeros_finaux: self.suppr_zeros_finaux,
            precision: self.precision,
            borne_exposant_inf: self.borne_exposant_inf,
            borne_exposant_sup: self.borne_exposant_sup,
            notation: self.notation,
            convertir_devise_locale: self.convertir_devise_locale,
            code_devise_locale: self.code_devise_locale.clone(),
            symbole_devise_locale: self.symbole_devise_locale.clone(),
            format_date: self.format_date.clone(),
            format_date_heure: self.format_date_heure.clone(),
        }
    }
}

/* ------------------------ Instantanés ------------------------ */

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReglagesTransformation {
    pub convertir_devise_locale: bool,
    pub code_devise_locale: String,
    pub symbole_devise_locale: String,
    pub raccourci_temperature: bool,
}

impl Default for ReglagesTransformation {
    fn default() -> Self {
        Reglages::default().transformation()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReglagesFormat {
    pub afficher_groupes: bool,
    pub symbole_groupement: String,
    pub separateur_decimal: String,
    pub suppr_zeros_finaux: bool,
    pub precision: Option<usize>,
    pub borne_exposant_inf: i32,
    pub borne_exposant_sup: i32,
    pub notation: Notation,
    pub convertir_devise_locale: bool,
    pub code_devise_locale: String,
    pub symbole_devise_locale: String,
    pub format_date: String,
    pub format_date_heure: String,
}

impl Default for ReglagesFormat {
    fn default() -> Self {
        Reglages::default().format()
    }
}

impl ReglagesFormat {
    pub fn options_notation(&self) -> OptionsNotation {
        OptionsNotation {
            precision: self.precision,
            borne_inf: self.borne_exposant_inf,
            borne_sup: self.borne_exposant_sup,
            notation: self.notation,
        }
    }

    /// Symbole de groupement effectif (None : pas de groupement).
    pub fn symbole_groupement(&self) -> Option<&str> {
        if self.afficher_groupes && !self.symbole_groupement.is_empty() {
            Some(&self.symbole_groupement)
        } else {
            None
        }
    }
}
