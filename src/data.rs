use once_cell::sync::Lazy;
use std::collections::HashMap;

// src/data.rs
// Static naming tables. Element symbols are stored lower case as they appear
// in webnucleo species names (e.g. "fe56", "he4").

/// Element symbols indexed by atomic number Z.
///
/// Index 0 is the neutron (`"n"`). Elements beyond the table are named with
/// the systematic digit names in [`EXTENDED_DIGIT_NAMES`].
pub static ELEMENT_SYMBOLS: &[&str] = &[
    "n", "h", "he", "li", "be", "b", "c", "n", "o", "f", "ne", "na", "mg", "al", "si", "p", "s",
    "cl", "ar", "k", "ca", "sc", "ti", "v", "cr", "mn", "fe", "co", "ni", "cu", "zn", "ga", "ge",
    "as", "se", "br", "kr", "rb", "sr", "y", "zr", "nb", "mo", "tc", "ru", "rh", "pd", "ag", "cd",
    "in", "sn", "sb", "te", "i", "xe", "cs", "ba", "la", "ce", "pr", "nd", "pm", "sm", "eu", "gd",
    "tb", "dy", "ho", "er", "tm", "yb", "lu", "hf", "ta", "w", "re", "os", "ir", "pt", "au", "hg",
    "tl", "pb", "bi", "po", "at", "rn", "fr", "ra", "ac", "th", "pa", "u", "np", "pu", "am", "cm",
    "bk", "cf", "es", "fm", "md", "no", "lr", "rf", "db", "sg", "bh", "hs", "mt", "ds", "rg", "cn",
    "nh", "fl", "mc", "lv", "ts", "og",
];

/// Systematic element-name letters for the decimal digits 0-9
/// (nil, un, bi, tri, quad, pent, hex, sept, oct, enn).
pub static EXTENDED_DIGIT_NAMES: [char; 10] = ['n', 'u', 'b', 't', 'q', 'p', 'h', 's', 'o', 'e'];

/// Map from element symbol to Z for the named elements.
///
/// `"n"` resolves to nitrogen (Z = 7); the neutron is handled by the name
/// parser before this lookup.
pub static ELEMENT_Z: Lazy<HashMap<&'static str, u32>> = Lazy::new(|| {
    let mut m = HashMap::new();
    for (z, &symbol) in ELEMENT_SYMBOLS.iter().enumerate().skip(1) {
        m.insert(symbol, z as u32);
    }
    m
});

/// LaTeX forms of the reaction tokens that are not nuclides.
///
/// The key set is the closed set of non-nuclide reaction elements: every
/// other reactant or product token is a nuclide.
pub static NON_NUCLIDE_LATEX: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert("gamma", "\\gamma");
    m.insert("electron", "{\\rm e}^-");
    m.insert("positron", "{\\rm e}^+");
    m.insert("neutrino_e", "\\nu_e");
    m.insert("anti-neutrino_e", "{\\bar \\nu}_e");
    m.insert("neutrino_mu", "\\nu_\\mu");
    m.insert("anti-neutrino_mu", "{\\bar \\nu}_\\mu");
    m.insert("neutrino_tau", "\\nu_\\tau");
    m.insert("anti-neutrino_tau", "{\\bar \\nu}_\\tau");
    m
});
