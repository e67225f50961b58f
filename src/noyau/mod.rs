//! Noyau texte ↔ moteur
//!
//! Organisation interne :
//! - balayage.rs       : remplacement gardé + zones d’exclusion (sans lookbehind)
//! - etapes.rs         : étapes ordonnées (déclencheur, réécriture) + démarche
//! - transformation.rs : ligne brute -> expression pour le moteur
//! - valeur.rs         : valeurs rendues par le moteur (nombre, unité, matrice, date)
//! - lecture.rs        : lecture décimale exacte des rationnels
//! - format.rs         : formatage numérique moteur (précision, bornes, notation)
//! - affichage.rs      : valeur -> texte affiché (groupement, séparateurs, devise)

pub mod affichage;
pub mod balayage;
pub mod etapes;
pub mod format;
pub mod lecture;
pub mod transformation;
pub mod valeur;

#[cfg(test)]
mod tests_scientifiques;

#[cfg(test)]
mod tests_fuzz_safe;

// API publique minimale
pub use affichage::formater;
pub use etapes::{Demarche, Etape, EtapeAppliquee};
pub use format::{Notation, OptionsNotation};
pub use transformation::{etapes_transformation, transformer, transformer_avec_demarche};
pub use valeur::{Nombre, Valeur};
