use crate::models::game::GameType;
use crate::models::session::CommandLineOverrides;
use crate::models::slot::AccountSlot;
use tracing::{info, warn};

const ACCOUNT_FLAG: &str = "--account";
const GAME_FLAG: &str = "--game";

/// Splits `--flag=value` / `--flag` (case-insensitive flag name).
/// Returns the inline value when the `=` form is used.
fn match_flag<'a>(arg: &'a str, flag: &str) -> Option<Option<&'a str>> {
    let head = arg.get(..flag.len())?;
    if !head.eq_ignore_ascii_case(flag) {
        return None;
    }
    match &arg[flag.len()..] {
        "" => Some(None),
        rest => rest.strip_prefix('=').map(Some),
    }
}

fn parse_slot(value: &str) -> Option<AccountSlot> {
    AccountSlot::from_name(value).or_else(|| {
        value
            .parse::<u32>()
            .ok()
            .and_then(AccountSlot::from_number)
    })
}

/// Parses process arguments (without the program path) into per-run overrides.
/// Never fails: bad values are dropped with a warning and scanning continues.
pub fn parse<S: AsRef<str>>(args: &[S]) -> CommandLineOverrides {
    let mut overrides = CommandLineOverrides::default();
    if args.is_empty() {
        return overrides;
    }

    let joined: Vec<&str> = args.iter().map(AsRef::as_ref).collect();
    info!("Command line: {}", joined.join(" "));

    let mut cursor = joined.iter().copied();
    while let Some(arg) = cursor.next() {
        if let Some(inline) = match_flag(arg, ACCOUNT_FLAG) {
            let value = inline.or_else(|| cursor.next());
            match value.map(str::trim).filter(|v| !v.is_empty()) {
                Some(v) => match parse_slot(v) {
                    Some(slot) => {
                        info!("Command line account slot: {slot}");
                        overrides.account_slot = Some(slot);
                    }
                    None => warn!("Ignoring invalid account slot {v:?}"),
                },
                None => warn!("{ACCOUNT_FLAG} given without a value"),
            }
        } else if let Some(inline) = match_flag(arg, GAME_FLAG) {
            let value = inline.or_else(|| cursor.next());
            match value.map(str::trim).filter(|v| !v.is_empty()) {
                Some(v) => match GameType::parse(v) {
                    Some(game) => {
                        info!("Command line game: {game}");
                        overrides.game = Some(game);
                    }
                    None => warn!("Ignoring invalid game {v:?}"),
                },
                None => warn!("{GAME_FLAG} given without a value"),
            }
        }
    }

    info!(
        "Command line parsed - account slot: {:?}, game: {:?}",
        overrides.account_slot, overrides.game
    );
    overrides
}
