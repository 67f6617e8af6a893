//! `start`: write the header of a new post.

use anyhow::{Result, bail};

use super::StartArgs;
use crate::config::PostConfig;
use crate::log;
use crate::logger::status_success;
use crate::post::{NewPost, Session};

pub fn start_post(config: &PostConfig, args: &StartArgs) -> Result<()> {
    let mut session = Session::resume_or_fresh(config)?;
    if let Some(post) = session.post()
        && !args.force
    {
        bail!(
            "post `{}` is in progress, export it or pass --force to replace it",
            post.meta.title
        );
    }

    let draft = new_post(config, args)?;
    let preview = config.root_relative(session.preview_path()?);
    let post = session.begin(draft)?;
    log!("post"; "header image {}", post.meta.header_image);
    status_success(&format!("started `{}` in {}", post.meta.title, preview.display()));
    Ok(())
}

/// Fill the fields the command line left out from the config.
fn new_post(config: &PostConfig, args: &StartArgs) -> Result<NewPost> {
    let Some(author) = args.author.clone().or_else(|| config.site.author.clone()) else {
        bail!("no author given, pass --author or set site.author in the config");
    };
    let date = args.date.clone().unwrap_or_else(|| config.site.today());
    Ok(NewPost {
        page_title: args.page_title.clone(),
        title: args.title.clone(),
        subtitle: args.subtitle.clone(),
        author,
        date,
        header_image: args.image.clone(),
    })
}
