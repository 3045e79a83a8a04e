use crate::components::thread::models::Thread;

/// Resolves the canonical path of a thread page.
pub trait ThreadLinkResolver {
    fn thread_link(&self, thread: &Thread) -> String;
}

impl<F> ThreadLinkResolver for F
where
    F: Fn(&Thread) -> String,
{
    fn thread_link(&self, thread: &Thread) -> String {
        self(thread)
    }
}

#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct SlugThreadLink;

impl ThreadLinkResolver for SlugThreadLink {
    fn thread_link(&self, thread: &Thread) -> String {
        get_thread_link(thread)
    }
}

/// `/<community>/<channel>/<title-slug>~<id>`, or `/thread/<id>` when the
/// thread lacks community routing fields.
pub fn get_thread_link(thread: &Thread) -> String {
    if thread.community_slug.is_empty() || thread.channel_slug.is_empty() {
        return format!("/thread/{}", thread.id);
    }
    let slug = slugify(&thread.title);
    if slug.is_empty() {
        format!(
            "/{}/{}/~{}",
            thread.community_slug, thread.channel_slug, thread.id
        )
    } else {
        format!(
            "/{}/{}/{}~{}",
            thread.community_slug, thread.channel_slug, slug, thread.id
        )
    }
}

pub fn slugify(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_dash = false;
    for ch in input.chars() {
        if ch.is_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.extend(ch.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    out
}

/// Splits the last path segment of a story link back into slug and id.
pub fn thread_id_from_slug(segment: &str) -> &str {
    segment.rsplit('~').next().unwrap_or(segment)
}
