use chrono::{Local, NaiveDateTime};

/// Wall-clock "now" in the server's local zone. Slot dates and times carry
/// no zone, so they are compared against local time.
pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}
