mod app;
mod entry;
mod logger;

use netpulse::error::AppResult;

fn main() -> AppResult<()> {
    entry::run()
}
