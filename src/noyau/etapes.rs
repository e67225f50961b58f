// src/noyau/etapes.rs

//! Étapes de réécriture ordonnées : (déclencheur, réécriture).
//!
//! Une étape dont le déclencheur ne reconnaît rien est un no-op.
//! Chaque étape voit uniquement le texte déjà réécrit par les précédentes.

use std::fmt;

use tracing::trace;

use crate::reglages::ReglagesTransformation;

pub type Declencheur = fn(&str, &ReglagesTransformation) -> bool;
pub type Reecriture = fn(&str, &ReglagesTransformation) -> String;

#[derive(Clone, Copy)]
pub struct Etape {
    pub nom: &'static str,
    pub declencheur: Declencheur,
    pub reecriture: Reecriture,
}

impl fmt::Debug for Etape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Etape").field("nom", &self.nom).finish_non_exhaustive()
    }
}

impl Etape {
    /// Applique l’étape seule. None si le déclencheur ne reconnaît pas la ligne.
    pub fn appliquer(&self, texte: &str, reglages: &ReglagesTransformation) -> Option<String> {
        if !(self.declencheur)(texte, reglages) {
            return None;
        }
        Some((self.reecriture)(texte, reglages))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EtapeAppliquee {
    pub nom: &'static str,
    pub avant: String,
    pub apres: String,
}

/// Démarche : les étapes qui ont réellement modifié la ligne, dans l’ordre.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Demarche {
    pub etapes: Vec<EtapeAppliquee>,
}

impl Demarche {
    pub fn noms(&self) -> Vec<&'static str> {
        self.etapes.iter().map(|e| e.nom).collect()
    }
}

/// Exécute les étapes dans l’ordre ; note dans `demarche` celles qui changent le texte.
pub fn executer(
    etapes: &[Etape],
    texte: &str,
    reglages: &ReglagesTransformation,
    mut demarche: Option<&mut Demarche>,
) -> String {
    let mut courant = texte.to_string();

    for etape in etapes {
        let Some(suivant) = etape.appliquer(&courant, reglages) else {
            continue;
        };
        // déclenchée mais toutes les correspondances refusées par les gardes
        if suivant == courant {
            continue;
        }

        trace!(etape = etape.nom, avant = %courant, apres = %suivant, "réécriture");
        if let Some(d) = demarche.as_deref_mut() {
            d.etapes.push(EtapeAppliquee {
                nom: etape.nom,
                avant: courant.clone(),
                apres: suivant.clone(),
            });
        }
        courant = suivant;
    }

    courant
}
