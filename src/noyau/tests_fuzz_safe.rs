//! Tests fuzz safe : robustesse + déterminisme + limites contrôlées.
//!
//! But : marteler les deux pipelines sans brûler la machine.
//! - RNG déterministe (seed fixe)
//! - lignes bornées (nombre de fragments)
//! - budget temps global
//! - invariants clés : fonctions totales, déterministes, date stable après un passage,
//!   groupement jamais dans les décimales

use std::time::{Duration, Instant};

use super::{formater, transformer, Nombre, Notation, Valeur};
use crate::reglages::{ReglagesFormat, ReglagesTransformation};

/* ------------------------ RNG déterministe minimal ------------------------ */

#[derive(Clone)]
struct Rng {
    state: u64,
}
impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }
    fn next_u32(&mut self) -> u32 {
        // LCG simple (déterministe)
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }
    fn pick(&mut self, n: u32) -> u32 {
        if n == 0 {
            0
        } else {
            self.next_u32() % n
        }
    }
    fn coin(&mut self) -> bool {
        (self.next_u32() & 1) == 1
    }
}

/* ------------------------ Budget anti-gel ------------------------ */

fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Génération de lignes (bornée) ------------------------ */

const FRAGMENTS: &[&str] = &[
    "1,000", "12,345,678", "f(1,000, 2)", "[3,000]", "$5", "$5USD", "$ 7", "in $", "€9",
    "10%", "+ 5%", "- 2.5%", "% off", "off of", " of ", "3 days ago", "2 weeks ago",
    "1/30/2021", "2021-1-30", "1/30/2021 10:10 PM UTC", "date(1-1-2021)", "date(\"1-1-2021\")",
    "date(", ")", "(", "]", "[", "72f", "20c", "72oF", "0x1f", "0xff", "// note", "/", "%",
    "now", "x", "price", "100", "0.5", " ", "+", "-", "*", "ago", "degF", "é", "∑", "\"",
];

fn gen_ligne(rng: &mut Rng) -> String {
    let n = 1 + rng.pick(8);
    let mut s = String::new();
    for _ in 0..n {
        let f = FRAGMENTS[rng.pick(FRAGMENTS.len() as u32) as usize];
        s.push_str(f);
        if rng.coin() {
            s.push(' ');
        }
    }
    s
}

fn gen_reglages_transformation(rng: &mut Rng) -> ReglagesTransformation {
    let (code, symbole) = match rng.pick(4) {
        0 => ("USD", "$"),
        1 => ("EUR", "€"),
        2 => ("GBP", "£"),
        _ => ("JPY", "\\"),
    };
    ReglagesTransformation {
        convertir_devise_locale: rng.coin(),
        code_devise_locale: code.into(),
        symbole_devise_locale: symbole.into(),
        raccourci_temperature: rng.coin(),
    }
}

fn gen_nombre(rng: &mut Rng) -> Nombre {
    let mantisse = rng.next_u32() as f64 / 997.0;
    let exposant = rng.pick(40) as i32 - 20;
    let x = mantisse * 10f64.powi(exposant);
    match rng.pick(4) {
        0 => Nombre::Flottant(-x),
        1 => {
            let numer = rng.pick(2_000_000) as i64 - 1_000_000;
            let denom = 1 + rng.pick(999) as i64;
            Nombre::rationnel(numer, denom).unwrap_or(Nombre::Flottant(x))
        }
        _ => Nombre::Flottant(x),
    }
}

fn gen_reglages_format(rng: &mut Rng) -> ReglagesFormat {
    let (groupe, decimal) = match rng.pick(4) {
        0 => (",", "."),
        1 => (".", ","),
        2 => (" ", ","),
        _ => ("", "."),
    };
    ReglagesFormat {
        symbole_groupement: groupe.into(),
        separateur_decimal: decimal.into(),
        suppr_zeros_finaux: rng.coin(),
        precision: if rng.coin() { Some(1 + rng.pick(20) as usize) } else { None },
        notation: match rng.pick(4) {
            0 => Notation::Fixe,
            1 => Notation::Exponentielle,
            2 => Notation::Ingenieur,
            _ => Notation::Auto,
        },
        convertir_devise_locale: rng.coin(),
        ..ReglagesFormat::default()
    }
}

/* ------------------------ Transformation ------------------------ */

#[test]
fn fuzz_transformation_totale_et_deterministe() {
    let start = Instant::now();
    let max = Duration::from_secs(20);
    let mut rng = Rng::new(0xC0FFEE);

    for _ in 0..800 {
        budget(start, max);

        let ligne = gen_ligne(&mut rng);
        let r = gen_reglages_transformation(&mut rng);

        let a = transformer(&ligne, &r);
        let b = transformer(&ligne, &r);
        assert_eq!(a, b, "non déterministe: ligne={ligne:?}");

        // seul le commentaire retire du texte sans rien remettre
        if !ligne.contains("//") {
            assert!(!a.is_empty(), "ligne vidée: {ligne:?}");
        }
    }
}

#[test]
fn fuzz_dates_stables_apres_un_passage() {
    let start = Instant::now();
    let max = Duration::from_secs(20);
    let mut rng = Rng::new(42);
    let r = ReglagesTransformation::default();

    const DATES: &[&str] = &["1/30/2021", "2021-1-30", "12-30-2021 19:10", "1/30/2021 10:10 PM UTC"];

    for _ in 0..500 {
        budget(start, max);
        let d = DATES[rng.pick(DATES.len() as u32) as usize];
        let ligne = if rng.coin() { format!("{d} + 1 day") } else { format!("x = {d}") };

        let une = transformer(&ligne, &r);
        assert_eq!(transformer(&une, &r), une, "ligne={ligne:?}");
        assert_eq!(une.matches("date(").count(), 1, "ligne={ligne:?} -> {une:?}");
    }
}

/* ------------------------ Affichage ------------------------ */

/// Partie entière (avant le séparateur décimal) : groupes de 3 après le premier.
fn check_groupes(affiche: &str, groupe: &str, decimal: &str) {
    if groupe.is_empty() || affiche.contains('e') {
        return;
    }
    let corps = affiche.trim_start_matches('-');
    let (entier, frac) = corps.split_once(decimal).unwrap_or((corps, ""));
    assert!(!frac.contains(groupe), "groupement dans les décimales: {affiche:?}");

    let groupes: Vec<&str> = entier.split(groupe).collect();
    for (i, g) in groupes.iter().enumerate() {
        if i == 0 {
            assert!((1..=3).contains(&g.len()), "tête de groupe: {affiche:?}");
        } else {
            assert_eq!(g.len(), 3, "groupe: {affiche:?}");
        }
    }
}

#[test]
fn fuzz_affichage_total_et_groupes_valides() {
    let start = Instant::now();
    let max = Duration::from_secs(20);
    let mut rng = Rng::new(7);

    for _ in 0..800 {
        budget(start, max);

        let n = gen_nombre(&mut rng);
        let r = gen_reglages_format(&mut rng);

        let a = formater(&Valeur::Nombre(n.clone()), &r);
        assert_eq!(a, formater(&Valeur::Nombre(n.clone()), &r));
        assert!(!a.is_empty());
        assert!(!a.contains('\u{E000}'), "marque décimale restante: {a:?}");

        if r.separateur_decimal != "." {
            assert!(!a.contains('.') || r.symbole_groupement == ".", "point restant: {a:?}");
        }
        check_groupes(&a, &r.symbole_groupement, &r.separateur_decimal);

        let u = formater(&Valeur::unite(n, "USD"), &r);
        if r.convertir_devise_locale {
            assert!(!u.ends_with(" USD"), "devise non réaffichée: {u:?}");
        }
    }
}
