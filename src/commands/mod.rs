pub mod completions;
pub mod install;
pub mod installed;
pub mod link;
pub mod search;
pub mod settings;
pub mod uninstall;
pub mod update;
pub mod verify;

use crate::error::Result;
use crate::installer::Installer;
use crate::linker::Linker;
use crate::resolver::ReleaseResolver;
use crate::state::InstalledWorkshops;
use crate::traits::AppContext;
use crate::uninstaller::Uninstaller;

/// Load the state store for this invocation.
pub(crate) fn open_store(ctx: &AppContext) -> Result<InstalledWorkshops> {
    InstalledWorkshops::load(ctx.paths.state_file())
}

/// Wire the install and uninstall pipelines to the context's collaborators
/// and hand them to `f`.
pub(crate) fn with_pipeline<T>(
    ctx: &AppContext,
    f: impl FnOnce(&ReleaseResolver<'_>, &Installer<'_>, &Uninstaller<'_>) -> Result<T>,
) -> Result<T> {
    let resolver = ReleaseResolver::new(ctx.github.as_ref());
    let linker = Linker::new(&ctx.paths);
    let installer = Installer::new(
        &ctx.paths,
        &ctx.catalog,
        &resolver,
        ctx.github.as_ref(),
        ctx.dependencies.as_ref(),
        ctx.notifier.as_ref(),
        &linker,
    );
    let uninstaller = Uninstaller::new(&ctx.paths, &linker);

    f(&resolver, &installer, &uninstaller)
}
