// src/noyau/balayage.rs

//! Balayage explicite : remplacement “gardé” + zones d’exclusion.
//!
//! Le moteur de regex n’a pas de lookbehind. Les conditions “ne pas toucher si
//! précédé de …” sont donc des gardes Rust qui regardent le texte autour du
//! candidat (avant / après).

use regex::{Captures, Regex};

/// Remplace chaque correspondance acceptée par la garde (gauche -> droite, sans chevauchement).
///
/// La garde reçoit le texte avant la correspondance, les captures, et le texte après.
/// Une correspondance refusée est laissée telle quelle, et la recherche reprend
/// au caractère suivant son début (comme un lookbehind qui échoue).
pub fn remplacer_garde<G, F>(re: &Regex, texte: &str, mut garde: G, mut remplacement: F) -> String
where
    G: FnMut(&str, &Captures<'_>, &str) -> bool,
    F: FnMut(&Captures<'_>) -> String,
{
    let mut out = String::with_capacity(texte.len());
    let mut dernier = 0;
    let mut debut = 0;

    while debut <= texte.len() {
        let Some(caps) = re.captures_at(texte, debut) else { break };
        let Some(m) = caps.get(0) else { break };

        if garde(&texte[..m.start()], &caps, &texte[m.end()..]) {
            out.push_str(&texte[dernier..m.start()]);
            out.push_str(&remplacement(&caps));
            dernier = m.end();
            if m.end() > m.start() {
                debut = m.end();
                continue;
            }
        }

        // refusée (ou vide) : un caractère plus loin que son début
        debut = m.start() + texte[m.start()..].chars().next().map_or(1, char::len_utf8);
    }

    out.push_str(&texte[dernier..]);
    out
}

/// Caractère de mot (au sens `\w`).
pub fn est_mot(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Profondeur d’imbrication `()` / `[]` à la fin de `avant`.
/// Une fermeture orpheline ne descend pas sous zéro.
pub fn profondeur_imbrication(avant: &str) -> usize {
    avant.chars().fold(0usize, |p, c| match c {
        '(' | '[' => p + 1,
        ')' | ']' => p.saturating_sub(1),
        _ => p,
    })
}

/// `avant` se termine-t-il par un appel `date(` ouvert ?
/// Tolère espaces, un guillemet, et jusqu’à 3 chiffres déjà consommés.
pub fn dans_appel_date(avant: &str) -> bool {
    let mut s = avant;
    for _ in 0..3 {
        match s.strip_suffix(|c: char| c.is_ascii_digit()) {
            Some(reste) => s = reste,
            None => break,
        }
    }
    let s = s.trim_end();
    let s = s.strip_suffix('"').unwrap_or(s).trim_end();
    s.ends_with("date(")
}

/// `avant` se termine-t-il au milieu d’un littéral hexadécimal (`0x1`, `0xa`…) ?
pub fn dans_litteral_hexa(avant: &str) -> bool {
    let s = avant.trim_end_matches(|c: char| c.is_ascii_hexdigit());
    s.ends_with("0x") || s.ends_with("0X")
}
