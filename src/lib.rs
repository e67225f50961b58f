// src/lib.rs
//
// Calculatrice texte : couche de réécriture d’un éditeur-calculatrice
// -------------------------------------------------------------------
// Deux pipelines purs, sans état partagé :
// - transformer : ligne “humaine” (dates, devises, %, “ago”, °F…) -> syntaxe stricte du moteur
// - formater    : valeur calculée par le moteur -> texte affiché
//
// Le moteur d’évaluation, l’éditeur et le magasin de réglages sont externes :
// on ne reçoit qu’un texte, une valeur, et un instantané de réglages.

pub mod noyau;
pub mod reglages;

pub use noyau::{
    formater, transformer, transformer_avec_demarche, Demarche, Nombre, Notation, Valeur,
};
pub use reglages::{ErreurReglages, Reglages, ReglagesFormat, ReglagesTransformation};
