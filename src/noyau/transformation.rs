// src/noyau/transformation.rs

//! Transformation d’entrée : ligne “humaine” -> syntaxe stricte du moteur.
//!
//! Onze étapes, ordre fixe (l’ordre compte) :
//! dates -> guillemets de date -> commentaire -> milliers -> devise
//! -> pourcentage ± -> “% off” -> pourcentage -> “of” -> “ago” -> température.
//!
//! Fonction totale : un motif non reconnu laisse le texte intact.

use std::sync::OnceLock;

use regex::{Captures, Regex};
use tracing::warn;

use super::balayage::{
    dans_appel_date, dans_litteral_hexa, est_mot, profondeur_imbrication, remplacer_garde,
};
use super::etapes::{executer, Demarche, Etape};
use crate::reglages::ReglagesTransformation;

/* ------------------------ Motifs ------------------------ */

fn motif(cellule: &'static OnceLock<Regex>, source: &str) -> &'static Regex {
    cellule.get_or_init(|| Regex::new(source).expect("motif statique invalide"))
}

/// Motif construit avec le symbole de devise des réglages.
/// Un motif refusé rend l’étape inerte (jamais d’échec).
fn motif_dynamique(source: &str) -> Option<Regex> {
    match Regex::new(source) {
        Ok(re) => Some(re),
        Err(err) => {
            warn!(%source, %err, "motif dynamique refusé");
            None
        }
    }
}

/// `[symbole]` optionnel devant un nombre ("" si pas de symbole).
fn prefixe_devise(reglages: &ReglagesTransformation) -> String {
    let symbole = &reglages.symbole_devise_locale;
    if symbole.is_empty() {
        String::new()
    } else {
        format!("(?:{})?", regex::escape(symbole))
    }
}

fn re_date_nue() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    motif(
        &RE,
        r"\b[0-9]{1,4}[-/][0-9]{1,2}[-/][0-9]{1,4}(?: [0-9]{1,2}:[0-9]{2}(?::[0-9]{2})?(?: [AP]M)?(?: [A-Z]{3})?)?",
    )
}

fn re_date_sans_guillemets() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    motif(&RE, r#"\bdate\(([^"]+?)\)"#)
}

fn re_commentaire() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    motif(&RE, r"//.*")
}

fn re_milliers() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    motif(&RE, r",([0-9]{3})")
}

fn re_pourcentage() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    motif(&RE, r"([0-9.,]+)%")
}

fn re_il_y_a() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    motif(&RE, r"([0-9.]+ [A-Za-z]+) ago")
}

fn re_degre_o() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    motif(&RE, r"o([FC])")
}

fn re_degre_f() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    motif(&RE, r"([\s0-9]+)f\b")
}

fn re_degre_c() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    motif(&RE, r"([\s0-9]+)c\b")
}

/* ------------------------ 1. Dates nues ------------------------ */

fn date_nue_presente(t: &str, _: &ReglagesTransformation) -> bool {
    re_date_nue().is_match(t)
}

/// 1/30/2021 10:10 PM UTC -> date("1/30/2021 10:10 PM UTC"), sauf si déjà dans date(…).
fn envelopper_dates(t: &str, _: &ReglagesTransformation) -> String {
    remplacer_garde(
        re_date_nue(),
        t,
        |avant, _, _| !dans_appel_date(avant),
        |c| format!("date(\"{}\")", &c[0]),
    )
}

/* ------------------------ 2. Guillemets de date ------------------------ */

fn date_sans_guillemets(t: &str, _: &ReglagesTransformation) -> bool {
    re_date_sans_guillemets().is_match(t)
}

/// date(1-1-2021) -> date("1-1-2021") ; date("1-1-2021") ne bouge pas.
fn citer_dates(t: &str, _: &ReglagesTransformation) -> String {
    re_date_sans_guillemets()
        .replace_all(t, |c: &Captures<'_>| format!("date(\"{}\")", &c[1]))
        .into_owned()
}

/* ------------------------ 3. Commentaire ------------------------ */

fn commentaire_present(t: &str, _: &ReglagesTransformation) -> bool {
    t.contains("//")
}

fn retirer_commentaire(t: &str, _: &ReglagesTransformation) -> String {
    re_commentaire().replace_all(t, "").into_owned()
}

/* ------------------------ 4. Milliers ------------------------ */

fn virgule_de_milliers(t: &str, _: &ReglagesTransformation) -> bool {
    re_milliers().is_match(t)
}

/// 1,000,000 -> 1000000, mais f(1,000) garde ses virgules (profondeur > 0).
fn retirer_milliers(t: &str, _: &ReglagesTransformation) -> String {
    remplacer_garde(
        re_milliers(),
        t,
        |avant, _, _| profondeur_imbrication(avant) == 0,
        |c| c[1].to_string(),
    )
}

/* ------------------------ 5. Devise locale ------------------------ */

fn devise_presente(t: &str, r: &ReglagesTransformation) -> bool {
    r.convertir_devise_locale
        && !r.symbole_devise_locale.is_empty()
        && t.contains(r.symbole_devise_locale.as_str())
}

/// Après un montant : chiffre, séparateur, majuscule, ou code à 3 lettres (`\b\s*[A-Z]{3}`).
fn montant_deja_qualifie(montant: &str, apres: &str) -> bool {
    let suivant = apres.chars().next();
    if suivant.is_some_and(|c| c.is_ascii_digit() || c == '.' || c == ',' || c.is_ascii_uppercase())
    {
        return true;
    }

    let fin_de_mot = montant.chars().last().is_some_and(est_mot) != suivant.is_some_and(est_mot);
    let code = apres.trim_start().chars().take(3).filter(|c| c.is_ascii_uppercase()).count();
    fin_de_mot && code == 3
}

/// $5USD -> 5USD ; $5 -> 5 USD ; in $ -> in USD.
fn normaliser_devise(t: &str, r: &ReglagesTransformation) -> String {
    let symbole = regex::escape(&r.symbole_devise_locale);
    let code = &r.code_devise_locale;

    let mut texte = t.to_string();

    // montant déjà suivi d’un code : on retire seulement le symbole
    if let Some(re) = motif_dynamique(&format!(r"{symbole}([0-9.]+\s*[A-Z]{{3}})")) {
        texte = re.replace_all(&texte, |c: &Captures<'_>| c[1].to_string()).into_owned();
    }

    if let Some(re) = motif_dynamique(&format!(r"{symbole}([0-9.,]+)")) {
        texte = remplacer_garde(
            &re,
            &texte,
            |_, c, apres| !montant_deja_qualifie(&c[1], apres),
            |c| format!("{} {code}", &c[1]),
        );
    }

    if let Some(re) = motif_dynamique(&format!(r"\bin\s+{symbole}")) {
        texte = re.replace_all(&texte, |_: &Captures<'_>| format!("in {code}")).into_owned();
    }

    texte
}

/* ------------------------ 6. Pourcentage ± ------------------------ */

fn pourcentage_present(t: &str, _: &ReglagesTransformation) -> bool {
    t.contains('%')
}

/// base ± x% -> base ± (base * x / 100) ; base = [symbole]nombre [unité] | variable.
fn developper_delta(t: &str, r: &ReglagesTransformation) -> String {
    let source = format!(
        r"((?:{}[0-9.]+\s*\w*)|\w+)\s*([+\-])\s*([0-9.]+)%",
        prefixe_devise(r)
    );
    let Some(re) = motif_dynamique(&source) else {
        return t.to_string();
    };

    re.replace_all(t, |c: &Captures<'_>| {
        let base = c[1].trim();
        format!("{base} {} ({base} * {} / 100)", &c[2], &c[3])
    })
    .into_owned()
}

/* ------------------------ 7. “% off” ------------------------ */

/// x% off [of] base -> x% * -base + base (le % est traité à l’étape suivante).
fn developper_remise(t: &str, r: &ReglagesTransformation) -> String {
    let source = format!(
        r"%\s+off(?: of)?\s+((?:{}[0-9.]+\s*\w*)|\w+)",
        prefixe_devise(r)
    );
    let Some(re) = motif_dynamique(&source) else {
        return t.to_string();
    };

    re.replace_all(t, |c: &Captures<'_>| {
        let base = &c[1];
        let nette = base.trim_end();
        format!("% * -{nette} + {nette}{}", &base[nette.len()..])
    })
    .into_owned()
}

/* ------------------------ 8. Pourcentage ------------------------ */

/// x% -> (x/100).
fn convertir_pourcentage(t: &str, _: &ReglagesTransformation) -> String {
    re_pourcentage()
        .replace_all(t, |c: &Captures<'_>| format!("({}/100)", &c[1]))
        .into_owned()
}

/* ------------------------ 9. “of” ------------------------ */

fn of_present(t: &str, _: &ReglagesTransformation) -> bool {
    t.contains(" of ")
}

fn of_vers_produit(t: &str, _: &ReglagesTransformation) -> String {
    t.replace(" of ", " * ")
}

/* ------------------------ 10. “ago” ------------------------ */

fn il_y_a_present(t: &str, _: &ReglagesTransformation) -> bool {
    re_il_y_a().is_match(t)
}

/// 3 days ago -> now - 3 days.
fn convertir_il_y_a(t: &str, _: &ReglagesTransformation) -> String {
    re_il_y_a()
        .replace_all(t, |c: &Captures<'_>| format!("now - {}", &c[1]))
        .into_owned()
}

/* ------------------------ 11. Température ------------------------ */

fn temperature_presente(t: &str, r: &ReglagesTransformation) -> bool {
    r.raccourci_temperature
        && (re_degre_o().is_match(t) || re_degre_f().is_match(t) || re_degre_c().is_match(t))
}

/// Les chiffres capturés prolongent un littéral `0x…` (pas d’espace entre les deux).
fn colle_a_un_hexa(avant: &str, chiffres: &str) -> bool {
    chiffres.starts_with(|c: char| c.is_ascii_digit()) && dans_litteral_hexa(avant)
}

/// 72oF -> 72degF ; 72f -> 72degF ; 0x1f intact ; 0x1 f -> 0x1 degF.
fn convertir_temperature(t: &str, _: &ReglagesTransformation) -> String {
    let texte = remplacer_garde(
        re_degre_o(),
        t,
        |avant, _, apres| {
            let precede = avant
                .chars()
                .last()
                .is_some_and(|c| c.is_whitespace() || c.is_ascii_digit() || c == '.' || c == '/');
            let colle = apres.chars().next().is_some_and(|c| c.is_ascii_alphabetic());
            precede && !colle
        },
        |c| format!("deg{}", &c[1]),
    );

    let texte = remplacer_garde(
        re_degre_f(),
        &texte,
        |avant, c, _| !colle_a_un_hexa(avant, &c[1]),
        |c| format!("{}degF", &c[1]),
    );

    remplacer_garde(
        re_degre_c(),
        &texte,
        |avant, c, _| !colle_a_un_hexa(avant, &c[1]),
        |c| format!("{}degC", &c[1]),
    )
}

/* ------------------------ Table ------------------------ */

static ETAPES: [Etape; 11] = [
    Etape {
        nom: "dates",
        declencheur: date_nue_presente,
        reecriture: envelopper_dates,
    },
    Etape {
        nom: "guillemets_date",
        declencheur: date_sans_guillemets,
        reecriture: citer_dates,
    },
    Etape {
        nom: "commentaire",
        declencheur: commentaire_present,
        reecriture: retirer_commentaire,
    },
    Etape {
        nom: "milliers",
        declencheur: virgule_de_milliers,
        reecriture: retirer_milliers,
    },
    Etape {
        nom: "devise",
        declencheur: devise_presente,
        reecriture: normaliser_devise,
    },
    Etape {
        nom: "pourcentage_delta",
        declencheur: pourcentage_present,
        reecriture: developper_delta,
    },
    Etape {
        nom: "pourcentage_remise",
        declencheur: pourcentage_present,
        reecriture: developper_remise,
    },
    Etape {
        nom: "pourcentage",
        declencheur: pourcentage_present,
        reecriture: convertir_pourcentage,
    },
    Etape {
        nom: "of",
        declencheur: of_present,
        reecriture: of_vers_produit,
    },
    Etape {
        nom: "il_y_a",
        declencheur: il_y_a_present,
        reecriture: convertir_il_y_a,
    },
    Etape {
        nom: "temperature",
        declencheur: temperature_presente,
        reecriture: convertir_temperature,
    },
];

/// Les étapes, dans l’ordre d’application.
pub fn etapes_transformation() -> &'static [Etape] {
    &ETAPES
}

pub(crate) fn etape(nom: &str) -> Option<&'static Etape> {
    ETAPES.iter().find(|e| e.nom == nom)
}

/* ------------------------ API ------------------------ */

/// Réécrit une ligne brute en expression pour le moteur.
pub fn transformer(texte: &str, reglages: &ReglagesTransformation) -> String {
    executer(&ETAPES, texte, reglages, None)
}

/// Comme `transformer`, avec la liste des étapes qui ont modifié la ligne.
pub fn transformer_avec_demarche(
    texte: &str,
    reglages: &ReglagesTransformation,
) -> (String, Demarche) {
    let mut demarche = Demarche::default();
    let out = executer(&ETAPES, texte, reglages, Some(&mut demarche));
    (out, demarche)
}
