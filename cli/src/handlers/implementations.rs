use std::fmt::Write;

use crate::handlers::{printing, utils};

use super::{
    ArtistCommand, ChartCommand, Command, CommandHandler, EntryCommand, FileCommand,
    MyListCommand, NamedCommand, SongCommand, UserCommand, VocalPatternCommand, utils::StdIn,
};

use anyhow::bail;
use sekai_api::{FilePart, Transport};
use sekai_core::{
    errors::{FormError, PageError},
    pages::{
        PageContext,
        auth::{LoginPage, SignupPage},
        chart_detail::ChartDetailPage,
        master::{
            ArtistForm, Catalog, CatalogPage, ChartForm, CreateForm, SingerForm, SongForm,
            UnitForm, VocalPatternForm,
        },
        mylist::MyListPage,
        mylist_detail::MyListDetailPage,
        mylist_edit::MyListEditPage,
        user::{DELETE_CONFIRMATION, UserPage},
    },
    route::Route,
};
use sekai_types::{Artist, Chart, Id, Singer, Song, Unit};

/// Print the message a page left: on stdout after a success, on stderr after a failure.
fn report<W1: Write, W2: Write>(
    result: Result<(), PageError>,
    message: Option<&str>,
    stdout: &mut W1,
    stderr: &mut W2,
) -> anyhow::Result<()> {
    match (result, message) {
        (Ok(()), Some(message)) => Ok(writeln!(stdout, "{message}")?),
        (Ok(()), None) => Ok(()),
        (Err(e), Some(message)) => {
            writeln!(stderr, "{message}")?;
            Err(e.into())
        }
        (Err(e), None) => Err(e.into()),
    }
}

impl CommandHandler for Command {
    type Output = anyhow::Result<()>;

    async fn handle<T: Transport, W1: std::fmt::Write + Send, W2: std::fmt::Write + Send>(
        &self,
        ctx: &PageContext<T>,
        stdout: &mut W1,
        stderr: &mut W2,
        stdin: &impl StdIn,
    ) -> Self::Output {
        let before = ctx.navigator.current();

        let result = match self {
            Self::Route { path } => {
                let route: Route = path.parse()?;
                Ok(writeln!(stdout, "{}", printing::route(&route)?)?)
            }
            Self::Signup {
                email,
                password,
                check_password,
            } => {
                let mut values = utils::read_missing(
                    stdin,
                    stderr,
                    &[
                        ("Password", password.as_deref()),
                        ("Confirm Password", check_password.as_deref()),
                    ],
                )?
                .into_iter();
                let mut page = SignupPage::new(ctx.clone());
                page.email.clone_from(email);
                page.password = values.next().unwrap_or_default();
                page.check_password = values.next().unwrap_or_default();

                let result = page.signup().await;
                report(result, page.message(), stdout, stderr)
            }
            Self::Login { email, password } => {
                let mut values =
                    utils::read_missing(stdin, stderr, &[("Password", password.as_deref())])?
                        .into_iter();
                let mut page = LoginPage::new(ctx.clone());
                page.email.clone_from(email);
                page.password = values.next().unwrap_or_default();

                let result = page.login().await;
                report(result, page.message(), stdout, stderr)
            }
            Self::Logout => {
                let mut page = UserPage::new(ctx.clone());
                let result = page.logout().await;
                report(result, page.message(), stdout, stderr)
            }
            Self::User { command } => command.handle(ctx, stdout, stderr, stdin).await,
            Self::Artist { command } => command.handle(ctx, stdout, stderr, stdin).await,
            Self::Singer { command } => {
                named::<T, Singer, SingerForm, _, _>(
                    command,
                    ctx,
                    stdout,
                    stderr,
                    ("Singers", printing::singer_list),
                    |name| SingerForm { name },
                )
                .await
            }
            Self::Unit { command } => {
                named::<T, Unit, UnitForm, _, _>(
                    command,
                    ctx,
                    stdout,
                    stderr,
                    ("Units", printing::unit_list),
                    |name| UnitForm { name },
                )
                .await
            }
            Self::Song { command } => command.handle(ctx, stdout, stderr, stdin).await,
            Self::VocalPattern { command } => command.handle(ctx, stdout, stderr, stdin).await,
            Self::Chart { command } => command.handle(ctx, stdout, stderr, stdin).await,
            Self::Mylist { command } => command.handle(ctx, stdout, stderr, stdin).await,
            Self::Entry { command } => command.handle(ctx, stdout, stderr, stdin).await,
            Self::File { command } => command.handle(ctx, stdout, stderr, stdin).await,
        };

        let after = ctx.navigator.current();
        if after != before {
            writeln!(stderr, "Navigated to {after}")?;
        }

        result
    }
}

impl CommandHandler for UserCommand {
    type Output = anyhow::Result<()>;

    async fn handle<T: Transport, W1: std::fmt::Write + Send, W2: std::fmt::Write + Send>(
        &self,
        ctx: &PageContext<T>,
        stdout: &mut W1,
        stderr: &mut W2,
        stdin: &impl StdIn,
    ) -> Self::Output {
        let mut page = UserPage::new(ctx.clone());

        match self {
            Self::Info => {
                let result = page.mount().await;
                report(result, page.message(), stdout, stderr)?;
                if let Some(user) = page.user() {
                    writeln!(stdout, "{}", printing::user(user)?)?;
                }
            }
            Self::ChangeEmail { email } => {
                let result = page.mount().await;
                report(result, page.message(), stdout, stderr)?;
                page.email.clone_from(email);

                let result = page.change_email().await;
                report(result, page.message(), stdout, stderr)?;
                if let Some(user) = page.user() {
                    writeln!(stdout, "{}", printing::user(user)?)?;
                }
            }
            Self::ChangePassword { old, new, check } => {
                let mut values = utils::read_missing(
                    stdin,
                    stderr,
                    &[
                        ("Current Password", old.as_deref()),
                        ("New Password", new.as_deref()),
                        ("Confirm New Password", check.as_deref()),
                    ],
                )?
                .into_iter();
                page.old_password = values.next().unwrap_or_default();
                page.new_password = values.next().unwrap_or_default();
                page.check_password = values.next().unwrap_or_default();

                let result = page.change_password().await;
                report(result, page.message(), stdout, stderr)?;
            }
            Self::Delete { yes } => {
                if !yes {
                    writeln!(stderr, "{DELETE_CONFIRMATION} (pass --yes to confirm)")?;
                }
                let result = page.delete_account(*yes).await;
                report(result, page.message(), stdout, stderr)?;
            }
        }

        Ok(())
    }
}

/// Mount the page of a master record kind; only admins get past this.
async fn catalog<T: Transport, E: Catalog>(
    ctx: &PageContext<T>,
) -> Result<CatalogPage<T, E>, PageError> {
    let mut page = CatalogPage::new(ctx.clone());
    page.mount().await?;
    Ok(page)
}

/// Mount the list of `E` and expand the row `id`, fetching the record on its own when the list
/// does not have it.
async fn detail<T: Transport, E: Catalog>(ctx: &PageContext<T>, id: Id) -> Result<E, PageError> {
    let mut page = catalog::<T, E>(ctx).await?;
    page.toggle_expanded(id);
    match page.expanded() {
        Some(record) => Ok(record.clone()),
        None => page.show(id).await,
    }
}

/// Submit `form` from the page of the records it creates, which is returned refreshed.
async fn create<T, F, W1, W2>(
    ctx: &PageContext<T>,
    form: &mut F,
    stdout: &mut W1,
    stderr: &mut W2,
) -> anyhow::Result<CatalogPage<T, F::Owner>>
where
    T: Transport,
    F: CreateForm,
    W1: Write,
    W2: Write,
{
    let mut page = catalog::<T, F::Owner>(ctx).await?;
    let result = page.create(form).await;
    report(result, page.message(), stdout, stderr)?;
    Ok(page)
}

type ListPrinter<E> = fn(&str, &[E]) -> Result<String, std::fmt::Error>;

/// The records made of just a name (singers and units) share their commands.
async fn named<T, E, F, W1, W2>(
    command: &NamedCommand,
    ctx: &PageContext<T>,
    stdout: &mut W1,
    stderr: &mut W2,
    (prefix, print): (&str, ListPrinter<E>),
    form: impl FnOnce(String) -> F,
) -> anyhow::Result<()>
where
    T: Transport,
    E: Catalog,
    F: CreateForm<Owner = E>,
    W1: Write,
    W2: Write,
{
    match command {
        NamedCommand::List => {
            let page = catalog::<T, E>(ctx).await?;
            writeln!(stdout, "{}", print(prefix, page.items())?)?;
        }
        NamedCommand::Show { id } => {
            let page = catalog::<T, E>(ctx).await?;
            let record = page.show(*id).await?;
            writeln!(stdout, "{}", print(prefix, std::slice::from_ref(&record))?)?;
        }
        NamedCommand::Create { name } => {
            let page = create(ctx, &mut form(name.clone()), stdout, stderr).await?;
            writeln!(stdout, "{}", print(prefix, page.items())?)?;
        }
    }

    Ok(())
}

impl CommandHandler for ArtistCommand {
    type Output = anyhow::Result<()>;

    async fn handle<T: Transport, W1: std::fmt::Write + Send, W2: std::fmt::Write + Send>(
        &self,
        ctx: &PageContext<T>,
        stdout: &mut W1,
        stderr: &mut W2,
        _: &impl StdIn,
    ) -> Self::Output {
        match self {
            Self::List => {
                let page = catalog::<T, Artist>(ctx).await?;
                writeln!(stdout, "{}", printing::artist_list("Artists", page.items())?)?;
            }
            Self::Show { id } => {
                let page = catalog::<T, Artist>(ctx).await?;
                let artist = page.show(*id).await?;
                writeln!(
                    stdout,
                    "{}",
                    printing::artist_list("Artist", std::slice::from_ref(&artist))?
                )?;
            }
            Self::Create { name, kana } => {
                let mut form = ArtistForm {
                    name: name.clone(),
                    kana: kana.clone(),
                };
                let page = create(ctx, &mut form, stdout, stderr).await?;
                writeln!(stdout, "{}", printing::artist_list("Artists", page.items())?)?;
            }
        }

        Ok(())
    }
}

impl CommandHandler for SongCommand {
    type Output = anyhow::Result<()>;

    async fn handle<T: Transport, W1: std::fmt::Write + Send, W2: std::fmt::Write + Send>(
        &self,
        ctx: &PageContext<T>,
        stdout: &mut W1,
        stderr: &mut W2,
        _: &impl StdIn,
    ) -> Self::Output {
        match self {
            Self::List => {
                let page = catalog::<T, Song>(ctx).await?;
                writeln!(stdout, "{}", printing::song_list("Songs", page.items())?)?;
            }
            Self::Show { id } => {
                let song = detail::<T, Song>(ctx, *id).await?;
                writeln!(stdout, "{}", printing::song(&song)?)?;
            }
            Self::Create {
                name,
                kana,
                lyrics,
                music,
                arrangement,
                thumbnail,
                original_video,
                release_time,
                deleted,
                units,
                music_video_types,
            } => {
                let mut form = SongForm {
                    name: name.clone(),
                    kana: kana.clone(),
                    lyrics_id: *lyrics,
                    music_id: *music,
                    arrangement_id: *arrangement,
                    thumbnail: None,
                    original_video: original_video.clone(),
                    release_time: *release_time,
                    deleted: *deleted,
                    unit_ids: units.clone(),
                    music_video_types: music_video_types.iter().copied().map(Into::into).collect(),
                };

                // the admin check runs before anything is uploaded
                let mut page = catalog::<T, Song>(ctx).await?;
                let file = FilePart::from_path(thumbnail).await?;
                let url = form.upload_thumbnail(&ctx.api, file).await?;
                writeln!(stdout, "Thumbnail uploaded to {url}")?;

                let result = page.create(&mut form).await;
                report(result, page.message(), stdout, stderr)?;
                writeln!(stdout, "{}", printing::song_list("Songs", page.items())?)?;
            }
        }

        Ok(())
    }
}

impl CommandHandler for VocalPatternCommand {
    type Output = anyhow::Result<()>;

    async fn handle<T: Transport, W1: std::fmt::Write + Send, W2: std::fmt::Write + Send>(
        &self,
        ctx: &PageContext<T>,
        stdout: &mut W1,
        stderr: &mut W2,
        _: &impl StdIn,
    ) -> Self::Output {
        match self {
            Self::Create {
                song_id,
                name,
                singers,
                positions,
            } => {
                let mut form = VocalPatternForm {
                    song_id: *song_id,
                    name: name.clone(),
                    singer_ids: singers.clone(),
                    singer_positions: positions.clone(),
                };
                let page = create(ctx, &mut form, stdout, stderr).await?;
                let song = page.show(*song_id).await?;
                writeln!(stdout, "{}", printing::song(&song)?)?;
            }
        }

        Ok(())
    }
}

impl CommandHandler for ChartCommand {
    type Output = anyhow::Result<()>;

    async fn handle<T: Transport, W1: std::fmt::Write + Send, W2: std::fmt::Write + Send>(
        &self,
        ctx: &PageContext<T>,
        stdout: &mut W1,
        stderr: &mut W2,
        _: &impl StdIn,
    ) -> Self::Output {
        match self {
            Self::List => {
                let page = catalog::<T, Chart>(ctx).await?;
                writeln!(stdout, "{}", printing::chart_list("Charts", page.items())?)?;
            }
            Self::Show { id } => {
                let chart = detail::<T, Chart>(ctx, *id).await?;
                writeln!(stdout, "{}", printing::chart(&chart)?)?;
            }
            Self::Create {
                song_id,
                difficulty,
                level,
                link,
            } => {
                let mut form = ChartForm {
                    song_id: *song_id,
                    difficulty_type: (*difficulty).into(),
                    level: *level,
                    chart_view_link: link.clone(),
                };
                let page = create(ctx, &mut form, stdout, stderr).await?;
                writeln!(stdout, "{}", printing::chart_list("Charts", page.items())?)?;
            }
        }

        Ok(())
    }
}

/// Mount the view of one list.
async fn my_list<T: Transport, W1: Write, W2: Write>(
    ctx: &PageContext<T>,
    id: Id,
    stdout: &mut W1,
    stderr: &mut W2,
) -> anyhow::Result<MyListDetailPage<T>> {
    let mut page = MyListDetailPage::new(ctx.clone(), id);
    let result = page.mount().await;
    report(result, page.message(), stdout, stderr)?;
    Ok(page)
}

fn print_my_list<T: Transport, W: Write>(
    page: &MyListDetailPage<T>,
    stdout: &mut W,
) -> anyhow::Result<()> {
    Ok(writeln!(
        stdout,
        "{}",
        printing::my_list(page.my_list_id(), page.my_list(), page.entries())?
    )?)
}

impl CommandHandler for MyListCommand {
    type Output = anyhow::Result<()>;

    #[allow(clippy::too_many_lines)]
    async fn handle<T: Transport, W1: std::fmt::Write + Send, W2: std::fmt::Write + Send>(
        &self,
        ctx: &PageContext<T>,
        stdout: &mut W1,
        stderr: &mut W2,
        _: &impl StdIn,
    ) -> Self::Output {
        match self {
            Self::List
            | Self::Create { .. }
            | Self::Rename { .. }
            | Self::Delete { .. }
            | Self::Move { .. } => {
                let mut page = MyListPage::new(ctx.clone());
                let result = page.mount().await;
                report(result, page.message(), stdout, stderr)?;

                let result = match self {
                    Self::Create { name } => {
                        page.new_name.clone_from(name);
                        page.create().await
                    }
                    Self::Rename { id, name } => {
                        if !page.lists().iter().any(|list| list.id == *id) {
                            return Err(PageError::NotFound(format!("list {id}")).into());
                        }
                        page.start_edit(*id);
                        if let Some(edit) = page.edit_name() {
                            edit.clone_from(name);
                        }
                        page.save_edit().await
                    }
                    Self::Delete { id } => page.delete(*id).await,
                    Self::Move { from, to } => {
                        let count = page.lists().len();
                        let (Some(from), Some(to)) = (from.checked_sub(1), to.checked_sub(1))
                        else {
                            bail!("positions start at 1");
                        };
                        if from >= count || to >= count {
                            bail!("there are only {count} lists");
                        }
                        page.drop_at(from, to).await
                    }
                    _ => Ok(()),
                };
                report(result, page.message(), stdout, stderr)?;

                writeln!(stdout, "{}", printing::my_lists(page.lists())?)?;
            }
            Self::Show { id } => {
                let page = my_list(ctx, *id, stdout, stderr).await?;
                print_my_list(&page, stdout)?;
            }
            Self::Charts { id } => {
                let mut page = MyListEditPage::new(ctx.clone(), *id);
                let result = page.mount().await;
                report(result, page.message(), stdout, stderr)?;
                writeln!(stdout, "{}", printing::chart_list("Charts", page.charts())?)?;
            }
            Self::Add {
                id,
                chart_id,
                clear_type,
                memo,
            } => {
                let mut page = MyListEditPage::new(ctx.clone(), *id);
                let result = page.mount().await;
                report(result, page.message(), stdout, stderr)?;
                if !page.charts().iter().any(|chart| chart.id == *chart_id) {
                    return Err(PageError::NotFound(format!("chart {chart_id}")).into());
                }

                page.open_add(*chart_id);
                if let Some(form) = page.add_form() {
                    form.clear_type = clear_type.map(Into::into);
                    form.memo.clone_from(memo);
                }
                let result = page.confirm_add().await;
                report(result, page.message(), stdout, stderr)?;

                let page = my_list(ctx, *id, stdout, stderr).await?;
                print_my_list(&page, stdout)?;
            }
            Self::Remove { id, entry_id } => {
                let mut page = my_list(ctx, *id, stdout, stderr).await?;
                let result = page.delete_entry(*entry_id).await;
                report(result, page.message(), stdout, stderr)?;
                print_my_list(&page, stdout)?;
            }
        }

        Ok(())
    }
}

/// Mount the view of one entry, failing if the server does not know it.
async fn entry<T: Transport, W1: Write, W2: Write>(
    ctx: &PageContext<T>,
    list_id: Id,
    entry_id: Id,
    stdout: &mut W1,
    stderr: &mut W2,
) -> anyhow::Result<ChartDetailPage<T>> {
    let mut page = ChartDetailPage::new(ctx.clone(), list_id, entry_id);
    let result = page.mount().await;
    report(result, page.message(), stdout, stderr)?;
    if page.entry().is_none() {
        return Err(PageError::NotFound(format!("entry {entry_id}")).into());
    }
    Ok(page)
}

fn print_entry<T: Transport, W: Write>(
    page: &ChartDetailPage<T>,
    stdout: &mut W,
) -> anyhow::Result<()> {
    if let Some(entry) = page.entry() {
        writeln!(stdout, "{}", printing::entry(entry, page.attachments())?)?;
    }
    Ok(())
}

impl CommandHandler for EntryCommand {
    type Output = anyhow::Result<()>;

    async fn handle<T: Transport, W1: std::fmt::Write + Send, W2: std::fmt::Write + Send>(
        &self,
        ctx: &PageContext<T>,
        stdout: &mut W1,
        stderr: &mut W2,
        _: &impl StdIn,
    ) -> Self::Output {
        match self {
            Self::Show { list_id, entry_id } => {
                let page = entry(ctx, *list_id, *entry_id, stdout, stderr).await?;
                print_entry(&page, stdout)?;
            }
            Self::ClearType {
                list_id,
                entry_id,
                clear_type,
            } => {
                let mut page = entry(ctx, *list_id, *entry_id, stdout, stderr).await?;
                page.clear_type = (*clear_type).into();
                let result = page.save_clear_type().await;
                report(result, page.message(), stdout, stderr)?;
                print_entry(&page, stdout)?;
            }
            Self::Memo {
                list_id,
                entry_id,
                memo,
            } => {
                let mut page = entry(ctx, *list_id, *entry_id, stdout, stderr).await?;
                page.memo.clone_from(memo);
                let result = page.save_memo().await;
                report(result, page.message(), stdout, stderr)?;
                print_entry(&page, stdout)?;
            }
            Self::Save {
                list_id,
                entry_id,
                clear_type,
                memo,
            } => {
                let mut page = entry(ctx, *list_id, *entry_id, stdout, stderr).await?;
                if let Some(clear_type) = clear_type {
                    page.clear_type = (*clear_type).into();
                }
                if let Some(memo) = memo {
                    page.memo.clone_from(memo);
                }
                let result = page.save_all().await;
                report(result, page.message(), stdout, stderr)?;
                writeln!(stdout, "Saved entry {entry_id}")?;
            }
            Self::Attach {
                list_id,
                entry_id,
                file,
                caption,
                attachment_type,
            } => {
                // nothing gets uploaded for an attachment that could not be added
                if caption.trim().is_empty() {
                    return Err(FormError::Required("キャプション").into());
                }

                let mut page = entry(ctx, *list_id, *entry_id, stdout, stderr).await?;
                if let Some(attachment_type) = attachment_type {
                    page.attachment.attachment_type = (*attachment_type).into();
                }
                let file = FilePart::from_path(file).await?;
                let result = page.upload_attachment_file(file).await;
                report(result, page.message(), stdout, stderr)?;

                page.attachment.caption.clone_from(caption);
                let result = page.add_attachment().await;
                report(result, page.message(), stdout, stderr)?;
                print_entry(&page, stdout)?;
            }
            Self::Detach {
                list_id,
                entry_id,
                attachment_id,
            } => {
                let mut page = entry(ctx, *list_id, *entry_id, stdout, stderr).await?;
                let result = page.delete_attachment(*attachment_id).await;
                report(result, page.message(), stdout, stderr)?;
                print_entry(&page, stdout)?;
            }
        }

        Ok(())
    }
}

impl CommandHandler for FileCommand {
    type Output = anyhow::Result<()>;

    async fn handle<T: Transport, W1: std::fmt::Write + Send, W2: std::fmt::Write + Send>(
        &self,
        ctx: &PageContext<T>,
        stdout: &mut W1,
        _: &mut W2,
        _: &impl StdIn,
    ) -> Self::Output {
        match self {
            Self::Upload { kind, path } => {
                let file = FilePart::from_path(path).await?;
                let url = ctx.api.upload((*kind).into(), file).await?;
                writeln!(stdout, "{url}")?;
            }
            Self::Delete { url } => {
                ctx.api.delete_attachment_file(url).await?;
                writeln!(stdout, "Deleted {url}")?;
            }
        }

        Ok(())
    }
}
