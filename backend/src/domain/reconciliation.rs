//! Pure planning for wash-record updates.
//!
//! An update may move the wash to a different truck, repoint the current
//! truck's driver, and swap either photo. Planning is separated from
//! execution: these functions compare stored state against the submitted
//! payload and emit a plan the repository applies inside one transaction,
//! after which superseded storage objects are removed best-effort.

use crate::domain::account::AccountId;
use crate::domain::truck::LicensePlate;
use crate::domain::wash::{ImageSlot, StorageKey, WashImage};

/// How the wash's truck association changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TruckChange {
    /// Plate and driver both match the stored truck.
    Keep,
    /// Plate unchanged but the driver differs; update the truck in place.
    RepointDriver {
        /// New owning driver.
        driver_id: AccountId,
    },
    /// Plate differs; reuse an existing truck with that plate or create one
    /// owned by the submitted driver.
    Reassign {
        /// Submitted plate.
        plate: LicensePlate,
        /// Driver for a newly created truck.
        driver_id: AccountId,
    },
}

/// How one image slot changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotChange {
    /// Submitted key matches the stored attachment.
    Keep,
    /// No stored attachment; insert a row for the submitted key.
    Attach {
        /// Submitted key.
        key: StorageKey,
    },
    /// Stored attachment differs; delete its row, insert the submitted key,
    /// and queue the old object for removal after commit.
    Replace {
        /// Superseded key.
        old: StorageKey,
        /// Submitted key.
        new: StorageKey,
    },
}

impl SlotChange {
    fn plan(current: Option<&StorageKey>, submitted: &StorageKey) -> Self {
        match current {
            Some(existing) if existing == submitted => Self::Keep,
            Some(existing) => Self::Replace {
                old: existing.clone(),
                new: submitted.clone(),
            },
            None => Self::Attach {
                key: submitted.clone(),
            },
        }
    }
}

/// Combined plan for both image slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePlan {
    /// Change for the before slot.
    pub before: SlotChange,
    /// Change for the after slot.
    pub after: SlotChange,
}

impl ImagePlan {
    /// Storage keys whose rows are deleted and whose objects are removed
    /// after the transaction commits.
    pub fn superseded_keys(&self) -> Vec<StorageKey> {
        [&self.before, &self.after]
            .into_iter()
            .filter_map(|change| match change {
                SlotChange::Replace { old, .. } => Some(old.clone()),
                SlotChange::Keep | SlotChange::Attach { .. } => None,
            })
            .collect()
    }

    /// Attachment rows inserted by the transaction.
    pub fn rows_to_insert(&self) -> Vec<WashImage> {
        [
            (ImageSlot::Before, &self.before),
            (ImageSlot::After, &self.after),
        ]
        .into_iter()
        .filter_map(|(slot, change)| match change {
            SlotChange::Attach { key } | SlotChange::Replace { new: key, .. } => {
                Some(WashImage {
                    slot,
                    key: key.clone(),
                })
            }
            SlotChange::Keep => None,
        })
        .collect()
    }

    /// Whether the transaction has any image rows to touch.
    pub fn is_noop(&self) -> bool {
        self.before == SlotChange::Keep && self.after == SlotChange::Keep
    }
}

/// Decide how the truck association changes for an update.
pub fn plan_truck_change(
    current_plate: &LicensePlate,
    current_driver: &AccountId,
    submitted_plate: &LicensePlate,
    submitted_driver: &AccountId,
) -> TruckChange {
    if current_plate != submitted_plate {
        TruckChange::Reassign {
            plate: submitted_plate.clone(),
            driver_id: *submitted_driver,
        }
    } else if current_driver != submitted_driver {
        TruckChange::RepointDriver {
            driver_id: *submitted_driver,
        }
    } else {
        TruckChange::Keep
    }
}

/// Decide how both image slots change for an update.
pub fn plan_images(
    current_before: Option<&StorageKey>,
    current_after: Option<&StorageKey>,
    submitted_before: &StorageKey,
    submitted_after: &StorageKey,
) -> ImagePlan {
    ImagePlan {
        before: SlotChange::plan(current_before, submitted_before),
        after: SlotChange::plan(current_after, submitted_after),
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for reconciliation planning.
    use rstest::{fixture, rstest};

    use super::*;

    fn key(raw: &str) -> StorageKey {
        StorageKey::new(raw).expect("valid test key")
    }

    fn plate(raw: &str) -> LicensePlate {
        LicensePlate::new(raw).expect("valid test plate")
    }

    #[fixture]
    fn driver() -> AccountId {
        AccountId::new("0b9f3f68-6cbb-4b52-9db8-7e5f63f1a001").expect("valid id")
    }

    #[fixture]
    fn other_driver() -> AccountId {
        AccountId::new("0b9f3f68-6cbb-4b52-9db8-7e5f63f1a002").expect("valid id")
    }

    #[rstest]
    fn unchanged_truck_is_kept(driver: AccountId) {
        let change = plan_truck_change(&plate("AB-123"), &driver, &plate("AB-123"), &driver);
        assert_eq!(change, TruckChange::Keep);
    }

    #[rstest]
    fn changed_driver_repoints_in_place(driver: AccountId, other_driver: AccountId) {
        let change = plan_truck_change(&plate("AB-123"), &driver, &plate("AB-123"), &other_driver);
        assert_eq!(
            change,
            TruckChange::RepointDriver {
                driver_id: other_driver
            }
        );
    }

    #[rstest]
    fn changed_plate_reassigns_even_when_driver_also_changes(
        driver: AccountId,
        other_driver: AccountId,
    ) {
        let change = plan_truck_change(&plate("AB-123"), &driver, &plate("CD-456"), &other_driver);
        assert_eq!(
            change,
            TruckChange::Reassign {
                plate: plate("CD-456"),
                driver_id: other_driver
            }
        );
    }

    #[rstest]
    fn identical_keys_produce_a_noop_plan() {
        let before = key("washes/u/2026-06-12/before/a.jpeg");
        let after = key("washes/u/2026-06-12/after/b.jpeg");
        let plan = plan_images(Some(&before), Some(&after), &before, &after);

        assert!(plan.is_noop());
        assert!(plan.superseded_keys().is_empty());
        assert!(plan.rows_to_insert().is_empty());
    }

    #[rstest]
    fn changing_one_slot_leaves_the_other_untouched() {
        let before = key("washes/u/d/before/a.jpeg");
        let after = key("washes/u/d/after/b.jpeg");
        let replacement = key("washes/u/d/before/c.jpeg");
        let plan = plan_images(Some(&before), Some(&after), &replacement, &after);

        assert_eq!(plan.after, SlotChange::Keep);
        assert_eq!(plan.superseded_keys(), vec![before]);
        let inserts = plan.rows_to_insert();
        assert_eq!(inserts.len(), 1);
        assert_eq!(inserts[0].slot, ImageSlot::Before);
        assert_eq!(inserts[0].key, replacement);
    }

    #[rstest]
    fn both_slots_can_change_independently() {
        let plan = plan_images(
            Some(&key("old-before")),
            Some(&key("old-after")),
            &key("new-before"),
            &key("new-after"),
        );

        assert_eq!(
            plan.superseded_keys(),
            vec![key("old-before"), key("old-after")]
        );
        assert_eq!(plan.rows_to_insert().len(), 2);
    }

    #[rstest]
    fn empty_slot_attaches_without_queueing_a_delete() {
        let plan = plan_images(None, Some(&key("after")), &key("before"), &key("after"));

        assert_eq!(
            plan.before,
            SlotChange::Attach {
                key: key("before")
            }
        );
        assert!(plan.superseded_keys().is_empty());
        let inserts = plan.rows_to_insert();
        assert_eq!(inserts.len(), 1);
        assert_eq!(inserts[0].slot, ImageSlot::Before);
    }

    #[rstest]
    fn replanning_an_applied_update_is_idempotent() {
        // Second call with the same payload sees the new keys as current.
        let new_before = key("new-before");
        let new_after = key("new-after");
        let plan = plan_images(Some(&new_before), Some(&new_after), &new_before, &new_after);

        assert!(plan.superseded_keys().is_empty());
        assert!(plan.rows_to_insert().is_empty());
    }
}
