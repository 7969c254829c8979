use crate::error::Result;
use crate::traits::AppContext;
use crate::ui as output;

pub fn run(ctx: &AppContext) -> Result<()> {
    output::header("Settings");
    output::keyval("home", &ctx.paths.home().display().to_string());
    output::keyval(
        "settings file",
        &ctx.paths.settings_file().display().to_string(),
    );
    output::separator();
    for (key, value) in ctx.settings.entries() {
        output::keyval(key, &value);
    }
    Ok(())
}
