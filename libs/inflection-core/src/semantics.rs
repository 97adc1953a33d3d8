//! Opcodes that set grammatical context: grammemes, semes and roles.

use crate::error::TreeError;
use crate::indexing::DictTupleIndexing;
use crate::lookup::{DictLookup, Lookup};
use crate::tree::{ListOperation, ListTreeMap, Node, Tag};
use crate::types::{tags, Dictkey, Tags, Tuplekey};
use std::collections::BTreeMap;
use std::rc::Rc;

/// Marker opcodes understood by every language, with the axis each sets.
pub const GRAMMEMES: &[(&str, &str)] = &[
    ("perfect", "aspect"),
    ("imperfect", "aspect"),
    ("aorist", "aspect"),
    ("progressive", "aspect"),
    ("present", "tense"),
    ("past", "tense"),
    ("future", "tense"),
    ("infinitive", "verb-form"),
    ("finite", "verb-form"),
    ("active", "voice"),
    ("passive", "voice"),
    ("middle", "voice"),
    ("indicative", "mood"),
    ("subjunctive", "mood"),
    ("conditional", "mood"),
    ("imperative", "mood"),
];

/// Semantic role opcodes.
pub const ROLES: &[&str] = &["agent", "patient", "theme", "recipient", "modifier"];

/// Grammatical function of each role in each voice.
pub fn default_subjectivity() -> DictLookup<String> {
    let mut content = Vec::new();
    for voice in ["active", "passive", "middle"] {
        let passive = voice == "passive";
        for (role, subjectivity) in [
            ("agent", if passive { "modifier" } else { "subject" }),
            ("patient", if passive { "subject" } else { "direct-object" }),
            ("theme", if passive { "subject" } else { "direct-object" }),
            ("recipient", "indirect-object"),
            ("modifier", "modifier"),
        ] {
            content.push((Tuplekey::from_iter([voice, role]), subjectivity.to_string()));
        }
    }
    DictLookup::from_content("subjectivity", DictTupleIndexing::new(["voice", "role"]), content)
}

/// Subjectivity of `role` under the voice in `memory` (active if unset).
pub(crate) fn subjectivity_of(
    table: &DictLookup<String>,
    role: &str,
    memory: &Tags,
) -> Result<Option<String>, TreeError> {
    let voice = memory.get("voice").map(String::as_str).unwrap_or("active");
    let key = Dictkey::new().with("voice", voice).with("role", role);
    match table.lookup(&key) {
        Ok(subjectivity) => Ok(Some(subjectivity)),
        Err(error) if error.is_not_found() => Ok(None),
        Err(error) => Err(error.into()),
    }
}

/// The context-setting vocabulary of one language.
#[derive(Debug, Clone)]
pub struct ListSemantics {
    semes: BTreeMap<String, Tags>,
    subjectivity: Rc<DictLookup<String>>,
    cases: Rc<Tags>,
}

impl ListSemantics {
    /// `cases` maps each subjectivity to the case it takes.
    pub fn new(subjectivity: Rc<DictLookup<String>>, cases: Tags) -> Self {
        Self {
            semes: BTreeMap::new(),
            subjectivity,
            cases: Rc::new(cases),
        }
    }

    pub fn with_seme(mut self, opcode: impl Into<String>, tags: Tags) -> Self {
        self.semes.insert(opcode.into(), tags);
        self
    }

    pub fn with_semes<I, S>(mut self, semes: I) -> Self
    where
        I: IntoIterator<Item = (S, Tags)>,
        S: Into<String>,
    {
        self.semes
            .extend(semes.into_iter().map(|(opcode, tags)| (opcode.into(), tags)));
        self
    }

    pub fn subjectivity(&self) -> &Rc<DictLookup<String>> {
        &self.subjectivity
    }

    /// Every opcode this vocabulary handles.
    pub fn opcodes(&self) -> Vec<String> {
        let mut opcodes: Vec<String> = GRAMMEMES.iter().map(|(opcode, _)| opcode.to_string()).collect();
        opcodes.extend(ROLES.iter().map(|role| role.to_string()));
        opcodes.extend(self.semes.keys().cloned());
        opcodes
    }

    /// Tag operations for every grammeme, seme and role.
    ///
    /// With `remove` the marker tokens vanish from the output.
    pub fn operations(&self, remove: bool) -> ListTreeMap {
        let mut map = ListTreeMap::new();
        for (opcode, axis) in GRAMMEMES {
            map.insert(*opcode, Tag::new(tags([(*axis, *opcode)]), remove));
        }
        for (opcode, modifications) in &self.semes {
            map.insert(opcode.clone(), Tag::new(modifications.clone(), remove));
        }
        for role in ROLES {
            map.insert(
                *role,
                RoleOperation {
                    role: role.to_string(),
                    subjectivity: Rc::clone(&self.subjectivity),
                    cases: Rc::clone(&self.cases),
                    remove,
                },
            );
        }
        map
    }
}

/// Sets `role`, `subjectivity` and `case` for the rest of the list.
#[derive(Debug, Clone)]
pub struct RoleOperation {
    role: String,
    subjectivity: Rc<DictLookup<String>>,
    cases: Rc<Tags>,
    remove: bool,
}

impl ListOperation for RoleOperation {
    fn apply(&self, map: &ListTreeMap, tree: &[Node], memory: &Tags) -> Result<Node, TreeError> {
        let mut scoped = memory.clone();
        scoped.insert("role".to_string(), self.role.clone());
        if let Some(subjectivity) = subjectivity_of(&self.subjectivity, &self.role, memory)? {
            if let Some(case) = self.cases.get(&subjectivity) {
                scoped.insert("case".to_string(), case.clone());
            }
            scoped.insert("subjectivity".to_string(), subjectivity);
        }
        Tag::new(Tags::new(), self.remove).apply(map, tree, &scoped)
    }
}
