//! Loose references between collections.
//!
//! Nothing enforces these links. Resolving one yields either the target or
//! a `Dangling` marker carrying the reference that matched nothing.

use serde::Serialize;

use crate::entities::{breeding_record, health_record, kandang, livestock, sale};

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "resolution", rename_all = "lowercase")]
pub enum Resolution<'a, T, K> {
    Resolved { target: &'a T },
    Dangling { reference: K },
}

impl<'a, T, K> Resolution<'a, T, K> {
    pub fn target(&self) -> Option<&'a T> {
        match self {
            Resolution::Resolved { target } => Some(*target),
            Resolution::Dangling { .. } => None,
        }
    }

    pub fn is_dangling(&self) -> bool {
        matches!(self, Resolution::Dangling { .. })
    }
}

/// A kandang named by string, as stored in `livestock.location`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct KandangRef<'a>(&'a str);

impl<'a> KandangRef<'a> {
    pub fn new(name: &'a str) -> Self {
        Self(name)
    }

    /// Exact, case-sensitive name match.
    pub fn matches(&self, pen: &kandang::Model) -> bool {
        pen.name == self.0
    }

    pub fn resolve<'p>(
        &self,
        pens: &'p [kandang::Model],
    ) -> Resolution<'p, kandang::Model, String> {
        match pens.iter().find(|pen| self.matches(pen)) {
            Some(target) => Resolution::Resolved { target },
            None => Resolution::Dangling {
                reference: self.0.to_string(),
            },
        }
    }

    /// Animals whose location names this kandang. Occupancy is never stored.
    pub fn occupants<'h>(&self, herd: &'h [livestock::Model]) -> Vec<&'h livestock::Model> {
        herd.iter().filter(|animal| animal.location == self.0).collect()
    }
}

/// A livestock record addressed by id from another collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LivestockRef(pub i32);

impl LivestockRef {
    pub fn resolve<'h>(
        &self,
        herd: &'h [livestock::Model],
    ) -> Resolution<'h, livestock::Model, i32> {
        match herd.iter().find(|animal| animal.id == self.0) {
            Some(target) => Resolution::Resolved { target },
            None => Resolution::Dangling { reference: self.0 },
        }
    }
}

impl livestock::Model {
    pub fn location_ref(&self) -> KandangRef<'_> {
        KandangRef::new(&self.location)
    }
}

impl kandang::Model {
    pub fn name_ref(&self) -> KandangRef<'_> {
        KandangRef::new(&self.name)
    }
}

impl sale::Model {
    pub fn livestock_ref(&self) -> LivestockRef {
        LivestockRef(self.livestock_id)
    }
}

impl health_record::Model {
    pub fn livestock_ref(&self) -> LivestockRef {
        LivestockRef(self.livestock_id)
    }
}

impl breeding_record::Model {
    pub fn mother_ref(&self) -> LivestockRef {
        LivestockRef(self.mother_id)
    }

    pub fn father_ref(&self) -> Option<LivestockRef> {
        self.father_id.map(LivestockRef)
    }

    pub fn parentage<'h>(&self, herd: &'h [livestock::Model]) -> Parentage<'h> {
        Parentage {
            mother: self.mother_ref().resolve(herd),
            father: self.father_ref().map(|father| father.resolve(herd)),
        }
    }
}

/// Both parents of a breeding record. `father` is `None` when none was recorded.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Parentage<'h> {
    pub mother: Resolution<'h, livestock::Model, i32>,
    pub father: Option<Resolution<'h, livestock::Model, i32>>,
}

/// Animals whose `location` matches no kandang name.
pub fn dangling_locations<'h>(
    herd: &'h [livestock::Model],
    pens: &[kandang::Model],
) -> Vec<&'h livestock::Model> {
    herd.iter()
        .filter(|animal| animal.location_ref().resolve(pens).is_dangling())
        .collect()
}

/// Records (sales, health records) pointing at an animal id that no longer exists.
pub fn dangling_livestock_refs<'r, R>(
    records: &'r [R],
    herd: &[livestock::Model],
    livestock_ref: impl Fn(&R) -> LivestockRef,
) -> Vec<&'r R> {
    records
        .iter()
        .filter(|record| livestock_ref(record).resolve(herd).target().is_none())
        .collect()
}
