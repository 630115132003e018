use chrono::{NaiveDate, NaiveDateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::models::{Booking, BookingStatus, Salon, Stylist};

const TS_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const BOOKING_COLUMNS: &str = "id, salon_id, stylist_id, customer_id, customer_name, phone_number, email, title, notes, start_time, end_time, status, created_at, updated_at";

fn format_ts(ts: &NaiveDateTime) -> String {
    ts.format(TS_FORMAT).to_string()
}

fn now_ts() -> String {
    format_ts(&Utc::now().naive_utc())
}

fn parse_ts(s: &str) -> anyhow::Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, TS_FORMAT)
        .map_err(|e| anyhow::anyhow!("invalid stored timestamp {s:?}: {e}"))
}

// ── Bookings ──

pub fn create_booking(conn: &Connection, booking: &Booking) -> anyhow::Result<()> {
    conn.execute(
        &format!(
            "INSERT INTO bookings ({BOOKING_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)"
        ),
        params![
            booking.id,
            booking.salon_id,
            booking.stylist_id,
            booking.customer_id,
            booking.customer_name,
            booking.phone_number,
            booking.email,
            booking.title,
            booking.notes,
            format_ts(&booking.start_time),
            format_ts(&booking.end_time),
            booking.status.as_str(),
            format_ts(&booking.created_at),
            format_ts(&booking.updated_at),
        ],
    )?;
    Ok(())
}

/// Unscoped lookup, used by the public confirmation page.
pub fn get_booking_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<Booking>> {
    let row = conn
        .query_row(
            &format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?1"),
            params![id],
            |row| Ok(parse_booking_row(row)),
        )
        .optional()?;
    row.transpose()
}

pub fn get_salon_booking(
    conn: &Connection,
    salon_id: &str,
    id: &str,
) -> anyhow::Result<Option<Booking>> {
    let row = conn
        .query_row(
            &format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?1 AND salon_id = ?2"),
            params![id, salon_id],
            |row| Ok(parse_booking_row(row)),
        )
        .optional()?;
    row.transpose()
}

pub fn list_bookings_for_salon(conn: &Connection, salon_id: &str) -> anyhow::Result<Vec<Booking>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings WHERE salon_id = ?1 ORDER BY start_time ASC"
    ))?;

    let rows = stmt.query_map(params![salon_id], |row| Ok(parse_booking_row(row)))?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

/// Active (non-cancelled) bookings starting on `date`.
pub fn get_bookings_for_date(
    conn: &Connection,
    salon_id: &str,
    date: NaiveDate,
) -> anyhow::Result<Vec<Booking>> {
    let day_start = date.and_hms_opt(0, 0, 0).map(|d| format_ts(&d));
    let day_end = date.and_hms_opt(23, 59, 59).map(|d| format_ts(&d));

    let mut stmt = conn.prepare(&format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings
         WHERE salon_id = ?1 AND start_time >= ?2 AND start_time <= ?3 AND status != 'cancelled'
         ORDER BY start_time ASC"
    ))?;

    let rows = stmt.query_map(params![salon_id, day_start, day_end], |row| {
        Ok(parse_booking_row(row))
    })?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

pub fn update_booking_status(
    conn: &Connection,
    salon_id: &str,
    id: &str,
    status: BookingStatus,
) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE bookings SET status = ?1, updated_at = ?2 WHERE id = ?3 AND salon_id = ?4",
        params![status.as_str(), now_ts(), id, salon_id],
    )?;
    Ok(count > 0)
}

/// Sets the stylist and prefixes their name onto the current title.
pub fn assign_stylist(
    conn: &Connection,
    salon_id: &str,
    id: &str,
    stylist_id: &str,
    stylist_name: &str,
) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE bookings SET stylist_id = ?1, title = ?2 || ' - ' || title, updated_at = ?3
         WHERE id = ?4 AND salon_id = ?5",
        params![stylist_id, stylist_name, now_ts(), id, salon_id],
    )?;
    Ok(count > 0)
}

pub fn delete_booking(conn: &Connection, salon_id: &str, id: &str) -> anyhow::Result<bool> {
    let count = conn.execute(
        "DELETE FROM bookings WHERE id = ?1 AND salon_id = ?2",
        params![id, salon_id],
    )?;
    Ok(count > 0)
}

fn parse_booking_row(row: &rusqlite::Row) -> anyhow::Result<Booking> {
    let status_str: String = row.get(11)?;
    let start_time: String = row.get(9)?;
    let end_time: String = row.get(10)?;
    let created_at: String = row.get(12)?;
    let updated_at: String = row.get(13)?;

    Ok(Booking {
        id: row.get(0)?,
        salon_id: row.get(1)?,
        stylist_id: row.get(2)?,
        customer_id: row.get(3)?,
        customer_name: row.get(4)?,
        phone_number: row.get(5)?,
        email: row.get(6)?,
        title: row.get(7)?,
        notes: row.get(8)?,
        start_time: parse_ts(&start_time)?,
        end_time: parse_ts(&end_time)?,
        status: BookingStatus::parse(&status_str)
            .ok_or_else(|| anyhow::anyhow!("invalid stored status {status_str:?}"))?,
        created_at: parse_ts(&created_at)?,
        updated_at: parse_ts(&updated_at)?,
    })
}

// ── Stylists ──

pub fn create_stylist(conn: &Connection, stylist: &Stylist) -> anyhow::Result<()> {
    let specialties = serde_json::to_string(&stylist.specialties)?;
    conn.execute(
        "INSERT INTO stylists (id, salon_id, name, specialties, is_active, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            stylist.id,
            stylist.salon_id,
            stylist.name,
            specialties,
            stylist.is_active as i32,
            format_ts(&stylist.created_at),
        ],
    )?;
    Ok(())
}

pub fn list_stylists(conn: &Connection, salon_id: &str) -> anyhow::Result<Vec<Stylist>> {
    let mut stmt = conn.prepare(
        "SELECT id, salon_id, name, specialties, is_active, created_at
         FROM stylists WHERE salon_id = ?1 ORDER BY name ASC",
    )?;

    let rows = stmt.query_map(params![salon_id], |row| {
        let specialties: String = row.get(3)?;
        let created_at: String = row.get(5)?;
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            specialties,
            row.get::<_, i32>(4)? != 0,
            created_at,
        ))
    })?;

    let mut stylists = vec![];
    for row in rows {
        let (id, salon_id, name, specialties, is_active, created_at) = row?;
        stylists.push(Stylist {
            id,
            salon_id,
            name,
            specialties: serde_json::from_str(&specialties).unwrap_or_default(),
            is_active,
            created_at: parse_ts(&created_at)?,
        });
    }
    Ok(stylists)
}

// ── Salons ──

pub fn save_salon(conn: &Connection, salon: &Salon) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO salons (id, name, email, phone, address, api_token)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(id) DO UPDATE SET
           name = excluded.name,
           email = excluded.email,
           phone = excluded.phone,
           address = excluded.address,
           api_token = excluded.api_token,
           updated_at = datetime('now')",
        params![
            salon.id,
            salon.name,
            salon.email,
            salon.phone,
            salon.address,
            salon.api_token,
        ],
    )?;
    Ok(())
}

pub fn get_salon_by_token(conn: &Connection, token: &str) -> anyhow::Result<Option<Salon>> {
    let salon = conn
        .query_row(
            "SELECT id, name, email, phone, address, api_token FROM salons WHERE api_token = ?1",
            params![token],
            |row| {
                Ok(Salon {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    email: row.get(2)?,
                    phone: row.get(3)?,
                    address: row.get(4)?,
                    api_token: row.get(5)?,
                })
            },
        )
        .optional()?;
    Ok(salon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::models::{UNASSIGNED_STYLIST, WEB_BOOKING_TITLE};

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    fn booking(id: &str, salon_id: &str, start: &str, status: BookingStatus) -> Booking {
        let start_time = dt(start);
        Booking {
            id: id.to_string(),
            salon_id: salon_id.to_string(),
            stylist_id: UNASSIGNED_STYLIST.to_string(),
            customer_id: "hanako@example.jp".to_string(),
            customer_name: "Hanako".to_string(),
            phone_number: "090-1234-5678".to_string(),
            email: "hanako@example.jp".to_string(),
            title: WEB_BOOKING_TITLE.to_string(),
            notes: String::new(),
            start_time,
            end_time: start_time + chrono::Duration::minutes(60),
            status,
            created_at: dt("2025-03-01 09:00"),
            updated_at: dt("2025-03-01 09:00"),
        }
    }

    #[test]
    fn test_list_is_scoped_and_ordered() {
        let conn = db::init_db(":memory:").unwrap();
        create_booking(&conn, &booking("b2", "salon-a", "2025-04-02 10:00", BookingStatus::Confirmed)).unwrap();
        create_booking(&conn, &booking("b1", "salon-a", "2025-04-01 15:00", BookingStatus::Confirmed)).unwrap();
        create_booking(&conn, &booking("b3", "salon-b", "2025-04-01 09:00", BookingStatus::Confirmed)).unwrap();

        let list = list_bookings_for_salon(&conn, "salon-a").unwrap();
        let ids: Vec<&str> = list.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["b1", "b2"]);
    }

    #[test]
    fn test_round_trip_preserves_fields() {
        let conn = db::init_db(":memory:").unwrap();
        let original = booking("b1", "salon-a", "2025-04-01 10:30", BookingStatus::Pending);
        create_booking(&conn, &original).unwrap();

        let loaded = get_booking_by_id(&conn, "b1").unwrap().unwrap();
        assert_eq!(loaded, original);
        assert!(get_booking_by_id(&conn, "missing").unwrap().is_none());
    }

    #[test]
    fn test_rejects_non_positive_interval() {
        let conn = db::init_db(":memory:").unwrap();
        let mut bad = booking("b1", "salon-a", "2025-04-01 10:30", BookingStatus::Pending);
        bad.end_time = bad.start_time;
        assert!(create_booking(&conn, &bad).is_err());
    }

    #[test]
    fn test_bookings_for_date_skip_cancelled() {
        let conn = db::init_db(":memory:").unwrap();
        create_booking(&conn, &booking("b1", "salon-a", "2025-04-01 10:00", BookingStatus::Confirmed)).unwrap();
        create_booking(&conn, &booking("b2", "salon-a", "2025-04-01 12:00", BookingStatus::Cancelled)).unwrap();
        create_booking(&conn, &booking("b3", "salon-a", "2025-04-02 10:00", BookingStatus::Confirmed)).unwrap();

        let date = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
        let list = get_bookings_for_date(&conn, "salon-a", date).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id, "b1");
    }

    #[test]
    fn test_assign_stylist_prefixes_title() {
        let conn = db::init_db(":memory:").unwrap();
        create_booking(&conn, &booking("b1", "salon-a", "2025-04-01 10:00", BookingStatus::Confirmed)).unwrap();

        assert!(assign_stylist(&conn, "salon-a", "b1", "st-1", "Sato").unwrap());
        let loaded = get_booking_by_id(&conn, "b1").unwrap().unwrap();
        assert_eq!(loaded.stylist_id, "st-1");
        assert_eq!(loaded.title, "Sato - Web予約");
        assert!(loaded.updated_at > loaded.created_at);
    }

    #[test]
    fn test_status_update_refreshes_updated_at() {
        let conn = db::init_db(":memory:").unwrap();
        create_booking(&conn, &booking("b1", "salon-a", "2025-04-01 10:00", BookingStatus::Confirmed)).unwrap();

        assert!(update_booking_status(&conn, "salon-a", "b1", BookingStatus::Cancelled).unwrap());
        let loaded = get_booking_by_id(&conn, "b1").unwrap().unwrap();
        assert_eq!(loaded.status, BookingStatus::Cancelled);
        assert!(loaded.updated_at > dt("2025-03-01 09:00"));
        assert_eq!(loaded.created_at, dt("2025-03-01 09:00"));
    }

    #[test]
    fn test_unknown_stored_status_is_an_error() {
        let conn = db::init_db(":memory:").unwrap();
        create_booking(&conn, &booking("b1", "salon-a", "2025-04-01 10:00", BookingStatus::Cancelled)).unwrap();
        conn.execute("UPDATE bookings SET status = 'archived' WHERE id = 'b1'", [])
            .unwrap();

        let err = get_booking_by_id(&conn, "b1").unwrap_err();
        assert!(err.to_string().contains("archived"));
        assert!(list_bookings_for_salon(&conn, "salon-a").is_err());
    }

    #[test]
    fn test_mutations_respect_salon_scope() {
        let conn = db::init_db(":memory:").unwrap();
        create_booking(&conn, &booking("b1", "salon-a", "2025-04-01 10:00", BookingStatus::Confirmed)).unwrap();

        assert!(!update_booking_status(&conn, "salon-b", "b1", BookingStatus::Cancelled).unwrap());
        assert!(!delete_booking(&conn, "salon-b", "b1").unwrap());
        assert!(get_salon_booking(&conn, "salon-b", "b1").unwrap().is_none());

        assert!(delete_booking(&conn, "salon-a", "b1").unwrap());
        assert!(get_booking_by_id(&conn, "b1").unwrap().is_none());
    }

    #[test]
    fn test_stylists_round_trip() {
        let conn = db::init_db(":memory:").unwrap();
        let stylist = Stylist {
            id: "st-1".to_string(),
            salon_id: "salon-a".to_string(),
            name: "Sato".to_string(),
            specialties: vec!["cut".to_string(), "color".to_string()],
            is_active: true,
            created_at: dt("2025-03-01 09:00"),
        };
        create_stylist(&conn, &stylist).unwrap();

        assert_eq!(list_stylists(&conn, "salon-a").unwrap(), vec![stylist]);
        assert!(list_stylists(&conn, "salon-b").unwrap().is_empty());
    }

    #[test]
    fn test_salon_lookup_by_token() {
        let conn = db::init_db(":memory:").unwrap();
        let salon = Salon {
            id: "salon-a".to_string(),
            name: "Hair Studio".to_string(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            api_token: "secret".to_string(),
        };
        save_salon(&conn, &salon).unwrap();

        let found = get_salon_by_token(&conn, "secret").unwrap().unwrap();
        assert_eq!(found.id, "salon-a");
        assert!(get_salon_by_token(&conn, "nope").unwrap().is_none());
    }
}
