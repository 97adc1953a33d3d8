//! Test fixtures: a small English language directory.

use std::path::Path;

use serde_json::json;

pub const CONJUGATIONS: &str = "\
# present and past of be
verb\tperson\tnumber\ttense\tform
be\t1\tsingular\tpresent\tam
be\t2\tsingular\tpresent\tare
be\t3\tsingular\tpresent\tis
be\t1 2 3\tplural\tpresent\tare
be\t1 3\tsingular\tpast\twas
be\t2\tsingular\tpast\twere
be\t1 2 3\tplural\tpast\twere
eat\t3\tsingular\tpast\tate
";

pub const NOUNS: &str = "\
noun\tnumber\tcase\tform
man\tsingular\tnominative oblique\tman
man\tplural\tnominative oblique\tmen
apple\tsingular\tnominative oblique\tapple
";

pub const PRONOUNS: &str = "\
\t\tnominative\toblique
1\tsingular\tI\tme
2\tsingular\tyou\tyou
3\tsingular\tit\tit
1\tplural\twe\tus
2\tplural\tyou\tyou
3\tplural\tthey\tthem
";

/// The language definition, with `decks` as given.
pub fn language_json(decks: serde_json::Value) -> serde_json::Value {
    json!({
        "name": "english",
        "structure": {
            "sentence": ["subject", "verb", "direct-object"],
            "noun_phrase": ["art", "adj", "n"]
        },
        "semes": { "pronoun": { "noun-form": "pronoun" } },
        "cases": { "subject": "nominative", "direct-object": "oblique" },
        "grammar_tags": { "noun-form": "common" },
        "vocabulary": {
            "person": ["1", "2", "3"],
            "number": ["singular", "plural"],
            "case": ["nominative", "oblique"]
        },
        "lookups": [
            { "target": "conjugation", "axes": ["verb", "person", "number", "tense"] },
            {
                "target": "declension",
                "nested": {
                    "key": "noun-form",
                    "tables": {
                        "common": ["noun", "number", "case"],
                        "pronoun": ["person", "number", "case"]
                    }
                }
            }
        ],
        "tables": [
            { "file": "conjugations.tsv", "lookup": "conjugation" },
            { "file": "nouns.tsv", "lookup": "declension", "tags": { "noun-form": "common" } },
            {
                "file": "pronouns.tsv",
                "lookup": "declension",
                "layout": { "kind": "grid", "header_rows": 1, "header_columns": 2 },
                "tags": { "noun-form": "pronoun" }
            }
        ],
        "decks": decks
    })
}

/// The default decks: every person and number of `be`, and a sparse `eat` deck.
pub fn default_decks() -> serde_json::Value {
    json!([
        {
            "output": "be.html",
            "template": "[clause [agent pronoun np [n]] [vp [cloze [v be]]]]",
            "traversal": [
                ["tense", ["present", "past"]],
                ["person", ["1", "2", "3"]],
                ["number", ["singular", "plural"]]
            ]
        },
        {
            "output": "eat.html",
            "template": "[clause [agent np the [n man]] [vp [cloze [v eat]]] [patient np the [n apple]]]",
            "traversal": [
                ["tense", ["present", "past"]],
                ["number", ["singular", "plural"]]
            ],
            "tags": { "person": "3" }
        }
    ])
}

/// Write the English language directory with the default decks.
pub fn write_english(dir: &Path) {
    write_language(dir, language_json(default_decks()));
}

/// Write the English tables and `definition` into `dir`.
pub fn write_language(dir: &Path, definition: serde_json::Value) {
    std::fs::create_dir_all(dir).expect("Failed to create language directory");
    std::fs::write(dir.join("conjugations.tsv"), CONJUGATIONS).expect("Failed to write table");
    std::fs::write(dir.join("nouns.tsv"), NOUNS).expect("Failed to write table");
    std::fs::write(dir.join("pronouns.tsv"), PRONOUNS).expect("Failed to write table");
    std::fs::write(
        dir.join("language.json"),
        serde_json::to_string_pretty(&definition).expect("Failed to serialize definition"),
    )
    .expect("Failed to write definition");
}
