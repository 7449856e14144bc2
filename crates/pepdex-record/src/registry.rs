//! A set of records and the cross-references between them.
//!
//! Records are never removed; they only change status. `Replaces` and
//! `Superseded-By` must agree: if `new.replaces == Some(old)` then
//! `old.superseded_by == Some(new)`, and the other way round.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::RegistryError;
use crate::lifecycle::can_transition;
use crate::record::{Number, ProposalRecord, Status};

/// A cross-reference problem found by [`Registry::check_links`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum LinkIssue {
    SelfReference { number: Number, field: String },
    DanglingReplaces { number: Number, target: Number },
    DanglingSupersededBy { number: Number, target: Number },
    /// `number` replaces `target`, but `target` is not superseded by `number`.
    MissingSupersededBy { number: Number, target: Number, found: Option<Number> },
    /// `number` is superseded by `target`, but `target` does not replace `number`.
    MissingReplaces { number: Number, target: Number, found: Option<Number> },
    DanglingRequires { number: Number, target: Number },
    /// Has `Superseded-By` but its status says otherwise.
    StatusNotSuperseded { number: Number, status: Status },
}

impl LinkIssue {
    pub fn number(&self) -> Number {
        match self {
            LinkIssue::SelfReference { number, .. }
            | LinkIssue::DanglingReplaces { number, .. }
            | LinkIssue::DanglingSupersededBy { number, .. }
            | LinkIssue::MissingSupersededBy { number, .. }
            | LinkIssue::MissingReplaces { number, .. }
            | LinkIssue::DanglingRequires { number, .. }
            | LinkIssue::StatusNotSuperseded { number, .. } => *number,
        }
    }
}

impl std::fmt::Display for LinkIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn show(n: &Option<Number>) -> String {
            n.map(|n| n.to_string()).unwrap_or_else(|| "nothing".to_string())
        }
        match self {
            LinkIssue::SelfReference { number, field } => {
                write!(f, "{number}: `{field}` points at itself")
            }
            LinkIssue::DanglingReplaces { number, target } => {
                write!(f, "{number}: replaces unknown proposal {target}")
            }
            LinkIssue::DanglingSupersededBy { number, target } => {
                write!(f, "{number}: superseded by unknown proposal {target}")
            }
            LinkIssue::MissingSupersededBy {
                number,
                target,
                found,
            } => write!(
                f,
                "{number}: replaces {target}, but {target} is superseded by {}",
                show(found)
            ),
            LinkIssue::MissingReplaces {
                number,
                target,
                found,
            } => write!(
                f,
                "{number}: superseded by {target}, but {target} replaces {}",
                show(found)
            ),
            LinkIssue::DanglingRequires { number, target } => {
                write!(f, "{number}: requires unknown proposal {target}")
            }
            LinkIssue::StatusNotSuperseded { number, status } => {
                write!(f, "{number}: has Superseded-By but status is {status}")
            }
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Registry {
    records: BTreeMap<Number, ProposalRecord>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, record: ProposalRecord) -> Result<(), RegistryError> {
        let number = record.number();
        if self.records.contains_key(&number) {
            return Err(RegistryError::Duplicate(number));
        }
        self.records.insert(number, record);
        Ok(())
    }

    pub fn get(&self, number: Number) -> Option<&ProposalRecord> {
        self.records.get(&number)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in number order.
    pub fn iter(&self) -> impl Iterator<Item = &ProposalRecord> {
        self.records.values()
    }

    pub fn into_records(self) -> Vec<ProposalRecord> {
        self.records.into_values().collect()
    }

    /// Every cross-reference problem in the registry, sorted.
    pub fn check_links(&self) -> Vec<LinkIssue> {
        let mut issues = Vec::new();

        for record in self.records.values() {
            let number = record.number();

            if let Some(target) = record.replaces {
                if target == number {
                    issues.push(LinkIssue::SelfReference {
                        number,
                        field: "replaces".to_string(),
                    });
                } else {
                    match self.records.get(&target) {
                        None => issues.push(LinkIssue::DanglingReplaces { number, target }),
                        Some(old) if old.superseded_by != Some(number) => {
                            issues.push(LinkIssue::MissingSupersededBy {
                                number,
                                target,
                                found: old.superseded_by,
                            })
                        }
                        Some(_) => {}
                    }
                }
            }

            if let Some(target) = record.superseded_by {
                if target == number {
                    issues.push(LinkIssue::SelfReference {
                        number,
                        field: "superseded_by".to_string(),
                    });
                } else {
                    match self.records.get(&target) {
                        None => issues.push(LinkIssue::DanglingSupersededBy { number, target }),
                        Some(new) if new.replaces != Some(number) => {
                            issues.push(LinkIssue::MissingReplaces {
                                number,
                                target,
                                found: new.replaces,
                            })
                        }
                        Some(_) => {}
                    }
                }

                if !matches!(record.status, Status::Superseded | Status::Replaced) {
                    issues.push(LinkIssue::StatusNotSuperseded {
                        number,
                        status: record.status,
                    });
                }
            }

            for target in &record.requires {
                if *target == number {
                    issues.push(LinkIssue::SelfReference {
                        number,
                        field: "requires".to_string(),
                    });
                } else if !self.records.contains_key(target) {
                    issues.push(LinkIssue::DanglingRequires {
                        number,
                        target: *target,
                    });
                }
            }
        }

        issues.sort();
        issues
    }

    /// Record that `new` replaces `old`: both sides of the link are set and
    /// `old` moves to Superseded. Nothing changes on error.
    pub fn link_replacement(&mut self, old: Number, new: Number) -> Result<(), RegistryError> {
        if old == new {
            return Err(RegistryError::SelfReplacement(old));
        }
        let old_record = self.records.get(&old).ok_or(RegistryError::Unknown(old))?;
        let new_record = self.records.get(&new).ok_or(RegistryError::Unknown(new))?;

        if let Some(existing) = old_record.superseded_by.filter(|n| *n != new) {
            return Err(RegistryError::AlreadyLinked {
                number: old,
                existing,
            });
        }
        if let Some(existing) = new_record.replaces.filter(|n| *n != old) {
            return Err(RegistryError::AlreadyLinked {
                number: new,
                existing,
            });
        }

        let needs_transition = old_record.status != Status::Superseded;
        if needs_transition && !can_transition(old_record.status, Status::Superseded) {
            return Err(crate::error::LifecycleError::Transition {
                number: old,
                from: old_record.status,
                to: Status::Superseded,
            }
            .into());
        }

        if let Some(r) = self.records.get_mut(&old) {
            if needs_transition {
                r.advance_status(Status::Superseded)?;
            }
            r.superseded_by = Some(new);
        }
        if let Some(r) = self.records.get_mut(&new) {
            r.replaces = Some(old);
        }
        Ok(())
    }
}

impl FromIterator<ProposalRecord> for Registry {
    /// Later duplicates of a number are dropped; use [`Registry::insert`] to
    /// observe them.
    fn from_iter<T: IntoIterator<Item = ProposalRecord>>(iter: T) -> Self {
        let mut registry = Registry::new();
        for record in iter {
            let _ = registry.insert(record);
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::HeaderDate;
    use crate::record::ProposalType;

    fn rec(number: Number, status: Status) -> ProposalRecord {
        ProposalRecord::new(
            number,
            format!("Proposal {number}"),
            status,
            ProposalType::StandardsTrack,
            HeaderDate::from_ymd(2001, 1, 1).unwrap(),
        )
    }

    #[test]
    fn duplicate_numbers_are_rejected() {
        let mut reg = Registry::new();
        reg.insert(rec(1, Status::Draft)).unwrap();
        assert_eq!(
            reg.insert(rec(1, Status::Final)),
            Err(RegistryError::Duplicate(1))
        );
        assert_eq!(reg.get(1).unwrap().status, Status::Draft);
    }

    #[test]
    fn reciprocal_links_are_clean() {
        let mut old = rec(333, Status::Superseded);
        old.superseded_by = Some(3333);
        let mut new = rec(3333, Status::Final);
        new.replaces = Some(333);
        let reg: Registry = [old, new].into_iter().collect();
        assert!(reg.check_links().is_empty());
    }

    #[test]
    fn one_sided_replaces_is_reported() {
        let old = rec(333, Status::Final);
        let mut new = rec(3333, Status::Final);
        new.replaces = Some(333);
        let reg: Registry = [old, new].into_iter().collect();
        assert_eq!(
            reg.check_links(),
            vec![LinkIssue::MissingSupersededBy {
                number: 3333,
                target: 333,
                found: None
            }]
        );
    }

    #[test]
    fn dangling_references_are_reported() {
        let mut r = rec(10, Status::Superseded);
        r.superseded_by = Some(99);
        r.requires = vec![98];
        let reg: Registry = [r].into_iter().collect();
        let issues = reg.check_links();
        assert!(issues.contains(&LinkIssue::DanglingSupersededBy {
            number: 10,
            target: 99
        }));
        assert!(issues.contains(&LinkIssue::DanglingRequires {
            number: 10,
            target: 98
        }));
    }

    #[test]
    fn superseded_by_with_wrong_status_is_reported() {
        let mut old = rec(1, Status::Active);
        old.superseded_by = Some(2);
        let mut new = rec(2, Status::Active);
        new.replaces = Some(1);
        let reg: Registry = [old, new].into_iter().collect();
        assert_eq!(
            reg.check_links(),
            vec![LinkIssue::StatusNotSuperseded {
                number: 1,
                status: Status::Active
            }]
        );
    }

    #[test]
    fn link_replacement_sets_both_sides() {
        let mut reg: Registry = [rec(1, Status::Accepted), rec(2, Status::Draft)]
            .into_iter()
            .collect();
        reg.link_replacement(1, 2).expect("link");
        assert_eq!(reg.get(1).unwrap().superseded_by, Some(2));
        assert_eq!(reg.get(1).unwrap().status, Status::Superseded);
        assert_eq!(reg.get(2).unwrap().replaces, Some(1));
        assert!(reg.check_links().is_empty());
    }

    #[test]
    fn link_replacement_from_draft_is_refused_without_changes() {
        let mut reg: Registry = [rec(1, Status::Draft), rec(2, Status::Draft)]
            .into_iter()
            .collect();
        assert!(matches!(
            reg.link_replacement(1, 2),
            Err(RegistryError::Lifecycle(_))
        ));
        assert_eq!(reg.get(1).unwrap().superseded_by, None);
        assert_eq!(reg.get(2).unwrap().replaces, None);
    }

    #[test]
    fn link_replacement_refuses_a_second_successor() {
        let mut reg: Registry = [
            rec(1, Status::Accepted),
            rec(2, Status::Draft),
            rec(3, Status::Draft),
        ]
        .into_iter()
        .collect();
        reg.link_replacement(1, 2).expect("link");
        assert_eq!(
            reg.link_replacement(1, 3),
            Err(RegistryError::AlreadyLinked {
                number: 1,
                existing: 2
            })
        );
    }
}
