//! The session: the arena that owns every term, and the registry that deduplicates global
//! variables and constants.

use super::{Info, NodeKind, NumberDomain, StaleSessionAccess, Term, TermId};
use crate::{
    definitions::{DefinitionSet, ImplicitMatch},
    Config,
};
use indexmap::IndexMap;
use std::{
    cell::{Cell, RefCell},
    ops::Index,
    sync::atomic::{AtomicU32, Ordering},
};

// Generations are drawn from a process-wide counter, so that a handle from a cleared session, or
// from another session altogether, is always detected.
static NEXT_GENERATION: AtomicU32 = AtomicU32::new(1);

fn next_generation() -> u32 {
    NEXT_GENERATION.fetch_add(1, Ordering::Relaxed)
}

const NO_TYPE_INDEX: u32 = 0;
const PROP_INDEX: u32 = 1;

/// Everything that lives for one proof session: the terms, the registry tables, the loaded
/// definitions and the configuration.
///
/// A session offers no internal locking. Callers that build proof states from several threads
/// must serialize access to it.
pub struct Session {
    terms: Vec<Term>,
    generation: u32,

    /// Global variables and bound variables, by identifier.
    variables: IndexMap<String, TermId>,

    /// Constants, by display name.
    constants: IndexMap<String, TermId>,

    /// The number domains seen so far, kept sorted along the domain chain.
    number_domains: Vec<NumberDomain>,

    tag_counter: Cell<u64>,

    pub(crate) config: Config,
    pub(crate) definitions: DefinitionSet,

    // Overwritten by every implicit match attempt. Only meaningful right after the call that set
    // it.
    pub(crate) last_implicit: RefCell<Option<ImplicitMatch>>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Session {
    pub fn new(config: Config) -> Self {
        let mut session = Self {
            terms: Vec::new(),
            generation: next_generation(),
            variables: IndexMap::new(),
            constants: IndexMap::new(),
            number_domains: Vec::new(),
            tag_counter: Cell::new(0),
            config,
            definitions: DefinitionSet::default(),
            last_implicit: RefCell::new(None),
        };
        session.add_sentinels();
        session
    }

    fn add_sentinels(&mut self) {
        let no_type = TermId {
            index: NO_TYPE_INDEX,
            generation: self.generation,
        };
        self.terms.push(Term::new(
            NodeKind::NotProvided,
            Info::default(),
            Vec::new(),
            no_type,
        ));
        self.terms
            .push(Term::new(NodeKind::Prop, Info::default(), Vec::new(), no_type));
    }

    /// Drops every term, registry entry and loaded definition, and starts a new generation.
    ///
    /// Handles issued before this call are rejected afterwards.
    pub fn clear(&mut self) {
        let old = self.generation;
        self.terms.clear();
        self.variables.clear();
        self.constants.clear();
        self.number_domains.clear();
        self.tag_counter.set(0);
        self.definitions = DefinitionSet::default();
        self.last_implicit.replace(None);
        self.generation = next_generation();
        self.add_sentinels();
        log::info!("cleared session generation {}, now {}", old, self.generation);
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn set_config(&mut self, config: Config) {
        self.config = config;
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// The sentinel standing for the absence of a type.
    pub fn no_type(&self) -> TermId {
        TermId {
            index: NO_TYPE_INDEX,
            generation: self.generation,
        }
    }

    /// The type of propositions.
    pub fn prop(&self) -> TermId {
        TermId {
            index: PROP_INDEX,
            generation: self.generation,
        }
    }

    pub fn is_no_type(&self, id: TermId) -> bool {
        id == self.no_type()
    }

    /// Checks that `id` was issued by this session, in its current generation.
    pub fn check(&self, id: TermId) -> Result<(), StaleSessionAccess> {
        if id.generation == self.generation && (id.index as usize) < self.terms.len() {
            Ok(())
        } else {
            Err(StaleSessionAccess {
                found: id.generation,
                current: self.generation,
            })
        }
    }

    /// Returns the term `id` refers to, or an error if the handle is stale.
    pub fn get(&self, id: TermId) -> Result<&Term, StaleSessionAccess> {
        self.check(id)?;
        Ok(&self.terms[id.index as usize])
    }

    pub(crate) fn term_mut(&mut self, id: TermId) -> &mut Term {
        self.assert_current(id);
        &mut self.terms[id.index as usize]
    }

    fn assert_current(&self, id: TermId) {
        if let Err(e) = self.check(id) {
            panic!("{}", e);
        }
    }

    /// Stores a term as is, without any normalization.
    pub(crate) fn push(&mut self, term: Term) -> TermId {
        let index = self.terms.len() as u32;
        self.terms.push(term);
        TermId { index, generation: self.generation }
    }

    /// The number of terms in the arena, sentinels included.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        // The sentinels are always present
        false
    }

    /// Returns a fresh tag to pair up two bound variables during a comparison.
    pub(crate) fn mint_tag(&self) -> u64 {
        let tag = self.tag_counter.get() + 1;
        self.tag_counter.set(tag);
        tag
    }

    /// The variables of the registry, in the order they were first constructed.
    pub fn variables(&self) -> impl Iterator<Item = (&str, TermId)> + '_ {
        self.variables.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn variable(&self, identifier: &str) -> Option<TermId> {
        self.variables.get(identifier).copied()
    }

    pub fn constants(&self) -> impl Iterator<Item = (&str, TermId)> + '_ {
        self.constants.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn constant(&self, name: &str) -> Option<TermId> {
        self.constants.get(name).copied()
    }

    pub(crate) fn register_variable(&mut self, identifier: String, id: TermId) {
        self.variables.insert(identifier, id);
    }

    pub(crate) fn register_constant(&mut self, name: String, id: TermId) {
        self.constants.insert(name, id);
    }

    /// The number domains seen so far, sorted along `ℕ ⊂ ℤ ⊂ ℚ ⊂ ℝ`.
    pub fn number_domains(&self) -> &[NumberDomain] {
        &self.number_domains
    }

    /// The largest number domain seen so far.
    pub fn largest_number_domain(&self) -> Option<NumberDomain> {
        self.number_domains.last().copied()
    }

    /// Inserts a domain at its sorted position, if it is not already present.
    pub(crate) fn insert_number_domain(&mut self, domain: NumberDomain) {
        if self.number_domains.contains(&domain) {
            return;
        }
        self.number_domains.push(domain);
        let mut i = self.number_domains.len() - 1;
        while i > 0 && self.number_domains[i - 1] > domain {
            self.number_domains.swap(i - 1, i);
            i -= 1;
        }
        log::debug!("number domains: {:?}", self.number_domains);
    }
}

impl Index<TermId> for Session {
    type Output = Term;

    /// Panics if `id` is stale. Use [`Session::get`] to check instead.
    fn index(&self, id: TermId) -> &Term {
        self.assert_current(id);
        &self.terms[id.index as usize]
    }
}
