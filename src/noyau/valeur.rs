// src/noyau/valeur.rs

//! Valeurs rendues par le moteur d’évaluation.
//!
//! La transformation ne les voit jamais : elles n’existent qu’en sortie,
//! pour l’affichage.

use std::fmt;

use chrono::NaiveDateTime;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, Zero};

/// Scalaire du moteur : flottant (nombre usuel) ou rationnel exact (grand nombre).
#[derive(Clone, Debug, PartialEq)]
pub enum Nombre {
    Flottant(f64),
    Rationnel(BigRational),
}

impl Nombre {
    /// `numer / denom` exact, réduit. `None` si le dénominateur est nul.
    pub fn rationnel(numer: i64, denom: i64) -> Option<Self> {
        if denom == 0 {
            return None;
        }
        Some(Nombre::Rationnel(BigRational::new(BigInt::from(numer), BigInt::from(denom))))
    }

    /// -0.0 n’est pas négatif.
    pub fn est_negatif(&self) -> bool {
        match self {
            Nombre::Flottant(x) => *x < 0.0,
            Nombre::Rationnel(r) => r.is_negative(),
        }
    }

    pub fn est_zero(&self) -> bool {
        match self {
            Nombre::Flottant(x) => *x == 0.0,
            Nombre::Rationnel(r) => r.is_zero(),
        }
    }
}

impl From<f64> for Nombre {
    fn from(x: f64) -> Self {
        Nombre::Flottant(x)
    }
}

impl From<BigRational> for Nombre {
    fn from(r: BigRational) -> Self {
        Nombre::Rationnel(r)
    }
}

impl fmt::Display for Nombre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Nombre::Flottant(x) => write!(f, "{x}"),
            Nombre::Rationnel(r) => write!(f, "{r}"),
        }
    }
}

/// Résultat d’une ligne évaluée.
#[derive(Clone, Debug, PartialEq)]
pub enum Valeur {
    Nombre(Nombre),
    /// Nombre porteur d’unité (`5 USD`, `3 days`, `72 degF`).
    Unite { valeur: Nombre, unite: String },
    /// Composite (matrice / liste), éventuellement imbriqué.
    Matrice(Vec<Valeur>),
    /// Date-heure calendaire (heure locale).
    Date(NaiveDateTime),
}

impl Valeur {
    pub fn unite(valeur: impl Into<Nombre>, unite: impl Into<String>) -> Self {
        Valeur::Unite {
            valeur: valeur.into(),
            unite: unite.into(),
        }
    }
}

impl From<f64> for Valeur {
    fn from(x: f64) -> Self {
        Valeur::Nombre(Nombre::Flottant(x))
    }
}

impl From<Nombre> for Valeur {
    fn from(n: Nombre) -> Self {
        Valeur::Nombre(n)
    }
}

impl From<NaiveDateTime> for Valeur {
    fn from(d: NaiveDateTime) -> Self {
        Valeur::Date(d)
    }
}
