//! Tests scientifiques (campagne) : scénarios de bout en bout + invariants.
//!
//! But : vérifier la chaîne complète telle que l’éditeur l’utilise.
//! - réglages lus depuis le magasin (TOML, clés camelCase)
//! - ligne brute -> transformer -> (moteur simulé) -> formater
//! - budget temps global (pipelines censés répondre en microsecondes)
//!
//! Le moteur n’existe pas ici : on fournit directement la valeur qu’il rendrait.

use std::time::{Duration, Instant};

use chrono::NaiveDate;
use pretty_assertions::assert_eq;

use super::{formater, transformer, transformer_avec_demarche, Nombre, Valeur};
use crate::reglages::Reglages;

fn reglages(toml: &str) -> Reglages {
    Reglages::depuis_toml(toml).unwrap_or_else(|e| panic!("réglages={toml:?} err={e}"))
}

fn assert_transforme(r: &Reglages, ligne: &str, attendu: &str) {
    assert_eq!(transformer(ligne, &r.transformation()), attendu, "ligne={ligne:?}");
}

fn assert_affiche(r: &Reglages, valeur: impl Into<Valeur>, attendu: &str) {
    let valeur = valeur.into();
    assert_eq!(formater(&valeur, &r.format()), attendu, "valeur={valeur:?}");
}

/// Budget global anti-gel.
fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Entrée ------------------------ */

#[test]
fn sci_dates_une_seule_enveloppe() {
    let r = Reglages::default();
    let une = transformer("1/30/2021 10:10 AM + 1 day", &r.transformation());
    assert_eq!(une, r#"date("1/30/2021 10:10 AM") + 1 day"#);
    assert_transforme(&r, &une, &une);
    assert_transforme(&r, r#"date("1-1-2021")"#, r#"date("1-1-2021")"#);
    assert_transforme(&r, "date(1-1-2021) - 3 days", r#"date("1-1-2021") - 3 days"#);
}

#[test]
fn sci_virgules_seulement_au_niveau_zero() {
    let r = Reglages::default();
    assert_transforme(&r, "f(1,000, 2,000)", "f(1,000, 2,000)");
    assert_transforme(&r, "1,000", "1000");
    assert_transforme(&r, "max([1,200, 3]) + 4,500", "max([1,200, 3]) + 4500");
}

#[test]
fn sci_pourcentages() {
    let r = Reglages::default();
    assert_transforme(&r, "100 + 10%", "100 + (100 * 10 / 100)");
    assert_transforme(&r, "20% off 100", "(20/100) * -100 + 100");
    assert_transforme(&r, "7.5% of 1,000", "(7.5/100) * 1000");
}

#[test]
fn sci_temps_relatif() {
    let r = Reglages::default();
    assert_transforme(&r, "3 days ago", "now - 3 days");
}

#[test]
fn sci_temperature() {
    let r = reglages("temperatureShortcut = true");
    assert_transforme(&r, "72f", "72degF");
    assert_transforme(&r, "72f to c", "72degF to degC");
    assert_transforme(&r, "0x1f", "0x1f");
}

#[test]
fn sci_devise_aller_retour() {
    let r = reglages(
        r#"
        convertLocalCurrency = true
        localCurrencyCode = "USD"
        localCurrencySymbol = "$"
        "#,
    );
    assert_transforme(&r, "$5", "5 USD");
    assert_transforme(&r, "$5USD", "5USD");
    assert_transforme(&r, "$5 - 10%", "5 USD - (5 USD * 10 / 100)");

    // 5 USD - 0.5 USD, calculé par le moteur
    assert_affiche(&r, Valeur::unite(4.5, "USD"), "$4.5");
    assert_affiche(&r, Valeur::unite(1_250_000.0, "USD"), "$1,250,000");
}

#[test]
fn sci_devise_locale_non_dollar() {
    let r = reglages(
        r#"
        convertLocalCurrency = true
        localCurrencyCode = "GBP"
        localCurrencySymbol = "£"
        "#,
    );
    assert_transforme(&r, "£30 + 5%", "30 GBP + (30 GBP * 5 / 100)");
    assert_transforme(&r, "40 EUR in £", "40 EUR in GBP");
    assert_affiche(&r, Valeur::unite(31.5, "GBP"), "£31.5");
}

/* ------------------------ Sortie ------------------------ */

#[test]
fn sci_groupement_et_zeros() {
    let r = Reglages::default();
    assert_affiche(&r, 1234567.891, "1,234,567.891");

    let r = reglages("trimTrailingZeros = true\nnotation = \"fixed\"\nprecision = 3");
    assert_affiche(&r, 10.5, "10.5");
    assert_affiche(&r, 10.0, "10");
    assert_affiche(&r, 1234.0, "1,234");
}

#[test]
fn sci_locale_europeenne() {
    let r = reglages("digitGroupingSymbol = \" \"\ndecimalSeparator = \",\"");
    assert_affiche(&r, 1234567.891, "1 234 567,891");
    assert_affiche(&r, Nombre::rationnel(1, 8).expect("dénominateur non nul"), "0,125");
}

#[test]
fn sci_bornes_exposant() {
    let r = reglages("lowerExponentBound = -2\nupperExponentBound = 6\nprecision = 4");
    assert_affiche(&r, 123456.0, "123,500");
    assert_affiche(&r, 1234567.0, "1.235e+6");
    assert_affiche(&r, 0.001234, "1.234e-3");
}

#[test]
fn sci_dates_affichees() {
    let r = Reglages::default();
    let jour = NaiveDate::from_ymd_opt(2021, 1, 30).expect("date");
    assert_affiche(&r, jour.and_hms_opt(0, 0, 0).expect("heure"), "1/30/2021");
    assert_affiche(&r, jour.and_hms_opt(0, 0, 1).expect("heure"), "1/30/2021, 12:00:01 AM");
}

/* ------------------------ Démarche ------------------------ */

#[test]
fn sci_demarche_ordre_respecte() {
    let r = reglages("convertLocalCurrency = true\ntemperatureShortcut = true");
    let (out, d) = transformer_avec_demarche("$1,000 + 10% // budget", &r.transformation());
    assert_eq!(out, "1000 USD + (1000 USD * 10 / 100) ");
    assert_eq!(d.noms(), vec!["commentaire", "milliers", "devise", "pourcentage_delta"]);
}

/* ------------------------ Stress borné ------------------------ */

#[test]
fn sci_lignes_longues_sous_budget() {
    let start = Instant::now();
    let max = Duration::from_secs(10);

    let r = reglages("convertLocalCurrency = true\ntemperatureShortcut = true");
    let t = r.transformation();
    let f = r.format();

    let ligne = "$1,000 + 10% of 3 days ago 1/1/2021 72f ".repeat(50);
    for _ in 0..50 {
        budget(start, max);
        let out = transformer(&ligne, &t);
        assert!(!out.contains('%'), "pourcentage restant: {out}");
        let _ = formater(&Valeur::unite(1e6, "USD"), &f);
    }
}
