use crate::{
    backend::{ReservationBackend, StoreError},
    schema::reservations,
    types::{Reservation, Role},
};
use chrono::{DateTime, NaiveDate, Utc};
use diesel::{
    result::DatabaseErrorKind,
    Connection, ConnectionError, ExpressionMethods, Insertable, PgConnection, QueryDsl, Queryable,
    RunQueryDsl, Selectable, SelectableHelper,
};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::error;
use uuid::Uuid;

#[derive(Insertable)]
#[diesel(table_name = reservations)]
struct NewReservation<'a> {
    date: NaiveDate,
    slot: &'a str,
    booker_name: &'a str,
    role: &'a str,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = reservations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
struct ReservationRow {
    id: Uuid,
    created_at: DateTime<Utc>,
    date: NaiveDate,
    slot: String,
    booker_name: String,
    role: String,
}

impl TryFrom<ReservationRow> for Reservation {
    type Error = StoreError;

    fn try_from(row: ReservationRow) -> Result<Self, Self::Error> {
        let role: Role = row
            .role
            .parse()
            .map_err(|err| StoreError::Corrupt(format!("reservation {}: {err}", row.id)))?;
        Ok(Reservation {
            id: row.id,
            created_at: row.created_at,
            date: row.date,
            slot: row.slot,
            booker_name: row.booker_name,
            role,
        })
    }
}

fn store_error(err: diesel::result::Error) -> StoreError {
    match err {
        diesel::result::Error::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            StoreError::Connection(info.message().to_string())
        }
        err => StoreError::Query(err.to_string()),
    }
}

#[derive(Clone)]
pub struct DatabaseInterface {
    connection: Arc<Mutex<PgConnection>>,
}

impl DatabaseInterface {
    pub fn new(database_url: &str) -> Result<Self, ConnectionError> {
        let connection = Self::establish_connection(database_url)?;
        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    fn establish_connection(database_url: &str) -> Result<PgConnection, ConnectionError> {
        PgConnection::establish(database_url)
    }

    fn connection(&self) -> Result<MutexGuard<'_, PgConnection>, StoreError> {
        self.connection.lock().map_err(|_| StoreError::LockPoisoned)
    }
}

impl ReservationBackend for DatabaseInterface {
    fn reservations(&self) -> Result<Vec<Reservation>, StoreError> {
        let mut connection = self.connection()?;

        let rows = reservations::table
            .select(ReservationRow::as_select())
            .order(reservations::created_at.asc())
            .load(&mut *connection)
            .map_err(|err| {
                error!(%err, "Failed to read reservations from database");
                store_error(err)
            })?;

        rows.into_iter().map(Reservation::try_from).collect()
    }

    fn append_reservation(
        &self,
        date: NaiveDate,
        slot: String,
        booker_name: String,
        role: Role,
    ) -> Result<Reservation, StoreError> {
        let mut connection = self.connection()?;

        let reservation = NewReservation {
            date,
            slot: &slot,
            booker_name: &booker_name,
            role: role.as_str(),
        };

        let row = diesel::insert_into(reservations::table)
            .values(&reservation)
            .returning(ReservationRow::as_returning())
            .get_result(&mut *connection)
            .map_err(|err| {
                error!(%err, "Reservation can't be added");
                store_error(err)
            })?;

        Reservation::try_from(row)
    }
}
