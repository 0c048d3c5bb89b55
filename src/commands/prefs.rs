use crate::args::DarkModeArgs;
use crate::commands::Out;
use crate::{Config, Result};

/// Shows the dark mode preference, or sets it when `on` or `off` is given.
pub async fn dark_mode(config: &Config, args: &DarkModeArgs) -> Result<Out<bool>> {
    let store = config.store();
    let on = match args.state() {
        Some(on) => {
            store.set_dark_mode(on).await?;
            on
        }
        None => store.dark_mode().await,
    };
    let state = if on { "on" } else { "off" };
    Ok(Out::new(format!("Dark mode is {state}"), on))
}
