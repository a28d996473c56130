//! Culture definitions bundled with the library.
//!
//! These are loaded by [`LocaleCatalog::with_embedded_cultures`](super::LocaleCatalog::with_embedded_cultures)
//! so that locale-aware attributes work without external files. Message tables
//! are empty; applications add their own with
//! [`LocaleCatalog::add_messages`](super::LocaleCatalog::add_messages).

/// American English, the default culture.
pub fn en_us() -> &'static str {
    r#"{
  "name": "en-US",
  "numberFormat": {
    "decimal": ".",
    "group": ",",
    "decimals": 2,
    "percentPattern": "n %",
    "percentSymbol": "%",
    "currencyPattern": "$n",
    "currencySymbol": "$"
  },
  "calendar": {
    "patterns": {
      "d": "M/d/yyyy",
      "D": "dddd, MMMM dd, yyyy",
      "t": "h:mm tt",
      "T": "h:mm:ss tt",
      "f": "dddd, MMMM dd, yyyy h:mm tt",
      "F": "dddd, MMMM dd, yyyy h:mm:ss tt",
      "M": "MMMM dd",
      "Y": "yyyy MMMM",
      "S": "yyyy'-'MM'-'dd'T'HH':'mm':'ss"
    }
  },
  "messages": {}
}"#
}

/// German (Germany).
pub fn de_de() -> &'static str {
    r#"{
  "name": "de-DE",
  "numberFormat": {
    "decimal": ",",
    "group": ".",
    "decimals": 2,
    "percentPattern": "n%",
    "percentSymbol": "%",
    "currencyPattern": "n $",
    "currencySymbol": "€"
  },
  "calendar": {
    "patterns": {
      "d": "dd.MM.yyyy",
      "D": "dddd, d. MMMM yyyy",
      "t": "HH:mm",
      "T": "HH:mm:ss",
      "f": "dddd, d. MMMM yyyy HH:mm",
      "F": "dddd, d. MMMM yyyy HH:mm:ss",
      "M": "dd MMMM",
      "Y": "MMMM yyyy",
      "S": "yyyy'-'MM'-'dd'T'HH':'mm':'ss"
    }
  },
  "messages": {}
}"#
}

/// French (France).
pub fn fr_fr() -> &'static str {
    r#"{
  "name": "fr-FR",
  "numberFormat": {
    "decimal": ",",
    "group": " ",
    "decimals": 2,
    "percentPattern": "n %",
    "percentSymbol": "%",
    "currencyPattern": "n $",
    "currencySymbol": "€"
  },
  "calendar": {
    "patterns": {
      "d": "dd/MM/yyyy",
      "D": "dddd d MMMM yyyy",
      "t": "HH:mm",
      "T": "HH:mm:ss",
      "f": "dddd d MMMM yyyy HH:mm",
      "F": "dddd d MMMM yyyy HH:mm:ss",
      "M": "d MMMM",
      "Y": "MMMM yyyy",
      "S": "yyyy'-'MM'-'dd'T'HH':'mm':'ss"
    }
  },
  "messages": {}
}"#
}

/// All bundled cultures, default first.
pub fn all() -> [&'static str; 3] {
    [en_us(), de_de(), fr_fr()]
}
