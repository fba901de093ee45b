//! Bed allocation: candidate listing, booking, withdrawal, reset.
//!
//! `book` is the only place a bed counter goes down and `withdraw` the only
//! place it goes back up; both run inside the store's locked transaction so
//! check-and-decrement (and delete-and-increment) are single atomic steps.
//! Candidate listing is a lock-free snapshot - staleness is resolved by the
//! backtracking retry in `book_first_available` or by the caller.

use crate::store::CapacityStore;
use crate::{BookOutcome, Condition, Error, Reservation, Result};
use chrono::Utc;
use uuid::Uuid;

/// List hospitals for a condition that still advertise beds
///
/// Returns names in registry (alphabetical) order. The result is a snapshot:
/// any pool may fill up before a booking is attempted, which `book` reports
/// as a `Conflict`.
pub fn list_candidates(store: &CapacityStore, condition: Condition) -> Result<Vec<String>> {
    let registry = store.read()?;
    Ok(registry
        .pools
        .values()
        .filter(|p| p.condition == condition && p.available_beds > 0)
        .map(|p| p.name.clone())
        .collect())
}

/// Attempt to book one bed at a named hospital
///
/// Re-reads the counter under the exclusive lock, never trusting any earlier
/// snapshot. On success the decrement and the new reservation commit
/// together; at zero beds nothing is mutated and `Conflict` is returned so
/// the caller can advance to another candidate.
pub fn book(store: &CapacityStore, pool_name: &str, requester: &str) -> Result<BookOutcome> {
    store.transact(|registry| {
        let pool = registry
            .pools
            .get_mut(pool_name)
            .ok_or_else(|| Error::PoolNotFound(pool_name.to_string()))?;

        if pool.available_beds == 0 {
            tracing::info!(pool = pool_name, requester, "Booking lost the race");
            return Ok(BookOutcome::Conflict);
        }

        pool.available_beds -= 1;
        let reservation = Reservation {
            id: Uuid::new_v4(),
            requester: requester.to_string(),
            pool: pool_name.to_string(),
            booked_at: Utc::now(),
        };
        registry.reservations.push(reservation.clone());

        tracing::info!(
            pool = pool_name,
            requester,
            remaining = pool.available_beds,
            "Booked bed"
        );
        Ok(BookOutcome::Confirmed(reservation))
    })
}

/// Withdraw an existing reservation, restoring its bed
///
/// Fails with `ReservationNotFound` and mutates nothing when the id does not
/// correspond to a live reservation (already-withdrawn included).
pub fn withdraw(store: &CapacityStore, reservation_id: Uuid) -> Result<Reservation> {
    store.transact(|registry| {
        let index = registry
            .reservation_index(reservation_id)
            .ok_or(Error::ReservationNotFound(reservation_id))?;
        let reservation = registry.reservations.remove(index);

        if let Some(pool) = registry.pools.get_mut(&reservation.pool) {
            pool.available_beds += 1;
        }

        tracing::info!(
            pool = %reservation.pool,
            requester = %reservation.requester,
            "Withdrew booking"
        );
        Ok(reservation)
    })
}

/// Administrative override: restore every pool to its seed bed count
///
/// Outstanding reservations are deliberately left in place; the mismatch
/// this can create between bookings and advertised capacity is accepted
/// operational behavior of the reset, not something to reconcile here.
pub fn reset_capacity(store: &CapacityStore) -> Result<()> {
    store.transact(|registry| {
        for pool in registry.pools.values_mut() {
            pool.available_beds = pool.initial_beds;
        }
        tracing::info!(pools = registry.pools.len(), "Reset all bed counts");
        Ok(())
    })
}

/// Book the first candidate with a free bed, backtracking past conflicts
///
/// Lists candidates once, then attempts each in order, advancing on
/// `Conflict`. Only when every candidate has been exhausted (or none
/// existed) does the requester see `NoCapacity`.
pub fn book_first_available(
    store: &CapacityStore,
    condition: Condition,
    requester: &str,
) -> Result<Reservation> {
    let candidates = list_candidates(store, condition)?;

    for candidate in &candidates {
        match book(store, candidate, requester)? {
            BookOutcome::Confirmed(reservation) => return Ok(reservation),
            BookOutcome::Conflict => {
                tracing::debug!(pool = %candidate, "Candidate filled up, trying next");
                continue;
            }
        }
    }

    Err(Error::NoCapacity(condition))
}
