// Species naming: webnucleo nuclide names ("fe56", "al26g", "n", "nn") and
// their LaTeX / graphviz labels.
use crate::data::{ELEMENT_SYMBOLS, ELEMENT_Z, EXTENDED_DIGIT_NAMES, NON_NUCLIDE_LATEX};
use crate::error::{Result, WnError};
use std::collections::HashMap;

/// Components of a species name split as (element, mass, state).
///
/// Letters before the first digit form the element, the following digits form
/// the mass, and everything after is the state label. `"al26g"` splits into
/// `("al", "26", "g")`, `"n"` into `("n", "", "")`.
pub fn species_substrings(name: &str) -> (String, String, String) {
    let mut elem = String::new();
    let mut mass = String::new();
    let mut state = String::new();
    let mut read_elem = false;
    let mut read_mass = false;
    for c in name.chars() {
        if c.is_alphabetic() && !read_elem {
            elem.push(c);
        } else if c.is_ascii_digit() && !read_mass {
            mass.push(c);
            read_elem = true;
        } else {
            read_mass = true;
            state.push(c);
        }
    }
    (elem, mass, state)
}

/// Returns true if `token` is one of the non-nuclide reaction elements
/// (gamma, electron, positron, neutrinos and anti-neutrinos).
#[inline]
pub fn is_non_nuclide_token(token: &str) -> bool {
    NON_NUCLIDE_LATEX.contains_key(token)
}

fn z_from_element_name(elem: &str) -> Option<u32> {
    if let Some(&z) = ELEMENT_Z.get(elem) {
        return Some(z);
    }
    // Systematic name: one letter per decimal digit of Z.
    let mut z: u32 = 0;
    for c in elem.chars() {
        let digit = EXTENDED_DIGIT_NAMES.iter().position(|&d| d == c)?;
        z = z.checked_mul(10)?.checked_add(digit as u32)?;
    }
    Some(z)
}

/// Element symbol for atomic number `z`, falling back to the systematic name
/// for elements beyond the table.
pub fn element_name(z: u32) -> String {
    if let Some(symbol) = ELEMENT_SYMBOLS.get(z as usize) {
        return symbol.to_string();
    }
    z.to_string()
        .chars()
        .filter_map(|c| c.to_digit(10))
        .map(|d| EXTENDED_DIGIT_NAMES[d as usize])
        .collect()
}

/// Parse a nuclide name into (Z, A, state).
///
/// `"n"` and `"nn"` are the neutron and dineutron; `"n14"` is nitrogen.
pub fn z_a_state_from_name(name: &str) -> Result<(u32, u32, String)> {
    let (elem, mass, state) = species_substrings(name);
    if elem.is_empty() {
        return Err(WnError::InvalidNuclideName(name.to_string()));
    }

    if elem.starts_with('n') && mass.is_empty() && elem.chars().all(|c| c == 'n') {
        return Ok((0, elem.len() as u32, state));
    }

    let a: u32 = mass
        .parse()
        .map_err(|_| WnError::InvalidNuclideName(name.to_string()))?;
    let z = z_from_element_name(&elem).ok_or_else(|| WnError::InvalidNuclideName(name.to_string()))?;
    Ok((z, a, state))
}

/// Build the canonical nuclide name from Z, A and a state suffix.
pub fn create_nuclide_name(z: u32, a: u32, state: &str) -> String {
    match (z, a) {
        (0, 1) => "n".to_string(),
        (0, 2) => "nn".to_string(),
        _ => format!("{}{}{}", element_name(z), a, state),
    }
}

fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(|c| c.to_lowercase())).collect(),
        None => String::new(),
    }
}

/// LaTeX label (without enclosing `$`) for a reaction token.
pub fn latex_string(token: &str) -> String {
    if let Some(latex) = NON_NUCLIDE_LATEX.get(token) {
        return latex.to_string();
    }
    let (elem, mass, state) = species_substrings(token);
    let elem = if mass.is_empty() { elem } else { title_case(&elem) };
    if state.is_empty() {
        format!("^{{{}}}\\rm{{{}}}", mass, elem)
    } else {
        format!("^{{{}}}\\rm{{{}}}_{{\\rm{{{}}}}}", mass, elem, state)
    }
}

/// Graphviz HTML-like label for a nuclide name.
pub fn graphviz_string(name: &str) -> String {
    let (elem, mass, state) = species_substrings(name);
    let elem = if mass.is_empty() { elem } else { title_case(&elem) };
    if state.is_empty() {
        format!("<<sup>{}</sup>{}>", mass, elem)
    } else {
        format!("<<sup>{}</sup>{}<sub>{}</sub>>", mass, elem, state)
    }
}

/// Map each nuclide name to its `$`-delimited LaTeX label.
pub fn latex_names<S: AsRef<str>>(nuclides: &[S]) -> HashMap<String, String> {
    nuclides
        .iter()
        .map(|n| (n.as_ref().to_string(), format!("${}$", latex_string(n.as_ref()))))
        .collect()
}

/// Map each nuclide name to its graphviz label.
pub fn graphviz_names<S: AsRef<str>>(nuclides: &[S]) -> HashMap<String, String> {
    nuclides
        .iter()
        .map(|n| (n.as_ref().to_string(), graphviz_string(n.as_ref())))
        .collect()
}
