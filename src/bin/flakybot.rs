//! Throwaway HTTP server for exercising statusbot by hand.
//!
//! `/rand` answers with a random status on every request; any other path
//! echoes a greeting. Port comes from Rocket's config (`ROCKET_PORT`, 8000).

#[macro_use]
extern crate rocket;

use rocket::http::Status;
use std::path::PathBuf;
use tracing::info;

const STATUSES: [Status; 4] = [
    Status::InternalServerError,
    Status::NotFound,
    Status::MovedPermanently,
    Status::Ok,
];

#[get("/rand")]
fn rand_page() -> (Status, &'static str) {
    let status = STATUSES[rand::random_range(0..STATUSES.len())];
    info!("Sent -> {}", status.code);
    (status, "Testing...")
}

#[get("/<path..>", rank = 2)]
fn greet(path: PathBuf) -> String {
    let visited = path.display().to_string();
    info!("Visited: {visited}");
    format!("Hello, {visited}!")
}

#[launch]
fn rocket() -> _ {
    statusbot::init_tracing();
    rocket::build().mount("/", routes![rand_page, greet])
}
