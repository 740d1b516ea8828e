use std::path::Path;

use clap::{Arg, ArgMatches, Command};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use cinevisor::pages::{CatalogPage, Notice};
use cinevisor::prelude::*;

fn cli() -> Command<'static> {
    let id_arg = || Arg::new("id").help("Movie or genre id").required(true);
    let page_arg = || {
        Arg::new("page")
            .short('p')
            .long("page")
            .takes_value(true)
            .default_value("1")
            .help("Result page")
    };

    Command::new("cinevisor")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Browse movies and manage CineVisor bookmarks from the terminal")
        .subcommand_required(true)
        .subcommand(Command::new("popular").about("Popular movies").arg(page_arg()))
        .subcommand(
            Command::new("search")
                .about("Search movies by title")
                .arg(Arg::new("query").required(true))
                .arg(page_arg()),
        )
        .subcommand(Command::new("details").about("Movie details").arg(id_arg()))
        .subcommand(
            Command::new("genre")
                .about("Movies of a genre")
                .arg(id_arg())
                .arg(page_arg()),
        )
        .subcommand(
            Command::new("login")
                .about("Log in with email and password")
                .arg(Arg::new("email").short('e').long("email").takes_value(true).required(true))
                .arg(Arg::new("password").short('p').long("password").takes_value(true).required(true)),
        )
        .subcommand(
            Command::new("signup")
                .about("Create an account")
                .arg(Arg::new("email").short('e').long("email").takes_value(true).required(true))
                .arg(Arg::new("password").short('p').long("password").takes_value(true).required(true))
                .arg(
                    Arg::new("confirm")
                        .short('c')
                        .long("confirm")
                        .takes_value(true)
                        .help("Password confirmation; defaults to --password"),
                )
                .arg(Arg::new("name").short('n').long("name").takes_value(true).required(true)),
        )
        .subcommand(Command::new("logout").about("Log out"))
        .subcommand(Command::new("whoami").about("Show the logged-in profile"))
        .subcommand(Command::new("bookmark").about("Toggle the bookmark on a movie").arg(id_arg()))
        .subcommand(Command::new("bookmarks").about("List bookmarked movies"))
        .subcommand(
            Command::new("nickname")
                .about("Change the nickname")
                .arg(Arg::new("name").required(true)),
        )
        .subcommand(
            Command::new("avatar")
                .about("Upload a new profile picture")
                .arg(Arg::new("file").required(true)),
        )
        .subcommand(Command::new("avatar-reset").about("Remove the profile picture"))
        .subcommand(
            Command::new("oauth-url")
                .about("Print the OAuth login URL")
                .arg(Arg::new("provider").required(true).possible_values(["kakao", "google"])),
        )
        .subcommand(
            Command::new("oauth-callback")
                .about("Finish an OAuth login from the redirect URL")
                .arg(Arg::new("url").required(true)),
        )
        .subcommand(
            Command::new("route")
                .about("Resolve a site path")
                .arg(Arg::new("path").required(true)),
        )
}

fn arg<'a>(matches: &'a ArgMatches, name: &str) -> Result<&'a str> {
    matches
        .value_of(name)
        .ok_or_else(|| Error::general(format!("missing argument: {}", name)))
}

fn number<T: std::str::FromStr>(matches: &ArgMatches, name: &str) -> Result<T> {
    let value = arg(matches, name)?;
    value
        .parse()
        .map_err(|_| Error::general(format!("{} must be a number: {}", name, value)))
}

fn print_catalog(page: &CatalogPage) {
    println!("{} ({}/{})", page.heading, page.page, page.total_pages);
    for card in &page.cards {
        println!("{} {:>8}  {:<4} {}", card.bookmark_icon(), card.id, card.score, card.title);
    }
}

fn print_profile(view: &ProfileView) {
    println!("nickname: {}", view.nickname);
    println!("email:    {}", view.email);
    println!("avatar:   {}", view.avatar_url);
}

async fn run(matches: ArgMatches) -> Result<()> {
    // Route resolution needs no configuration
    if let Some(("route", sub)) = matches.subcommand() {
        let path = arg(sub, "path")?;
        match Route::parse(path) {
            Some(route) => println!("{:?} layout={}", route, route.uses_layout()),
            None => println!("no page at {}", path),
        }
        return Ok(());
    }

    let app = CineVisor::new(AppConfig::from_env()?)?;
    if let Err(e) = app.bootstrap().await {
        warn!("continuing logged out: {}", e);
    }
    let pages = app.pages();

    match matches.subcommand() {
        Some(("popular", sub)) => print_catalog(&pages.home(number(sub, "page")?).await?),
        Some(("search", sub)) => {
            print_catalog(&pages.search(arg(sub, "query")?, number(sub, "page")?).await?)
        }
        Some(("genre", sub)) => {
            print_catalog(&pages.genre(number(sub, "id")?, number(sub, "page")?).await?)
        }
        Some(("details", sub)) => {
            let detail = pages.detail(number(sub, "id")?).await?;
            println!("{} {}  ⭐ {}", detail.target.title, if detail.bookmarked { "❤️" } else { "🤍" }, detail.score);
            let genres: Vec<&str> = detail.genres.iter().map(|g| g.name.as_str()).collect();
            println!("{}", genres.join(" · "));
            println!("{}", detail.poster_url);
            println!();
            println!("{}", detail.overview);
            if !detail.cast.is_empty() {
                println!();
                for member in &detail.cast {
                    println!("  {} ({})", member.name, member.character);
                }
            }
        }
        Some(("login", sub)) => {
            let user = app.log_in(arg(sub, "email")?, arg(sub, "password")?).await?;
            println!("logged in as {}", user.display_nickname());
        }
        Some(("signup", sub)) => {
            let password = arg(sub, "password")?;
            let form = SignUpForm {
                email: arg(sub, "email")?.to_string(),
                password: password.to_string(),
                password_confirm: sub.value_of("confirm").unwrap_or(password).to_string(),
                user_name: arg(sub, "name")?.to_string(),
            };
            match app.sign_up(&form).await? {
                SignUpOutcome::Session(session) => println!("signed up and logged in as {}", session.user.id),
                SignUpOutcome::ConfirmationRequired(_) => {
                    println!("check {} to confirm your account", form.email)
                }
            }
        }
        Some(("logout", _)) => {
            app.log_out().await?;
            println!("logged out");
        }
        Some(("whoami", _)) => match app.context().current_user().await {
            Some(user) => print_profile(&ProfileView::from(&user)),
            None => println!("not logged in"),
        },
        Some(("bookmark", sub)) => {
            let movie = app.movies().details(number(sub, "id")?).await?;
            let target = BookmarkTarget::from(&movie);
            let bookmarked = app.toggle_bookmark(&target).await?;
            println!("{} {}", if bookmarked { "❤️" } else { "🤍" }, target.title);
        }
        Some(("bookmarks", _)) => {
            let page = pages.mypage().await?;
            for card in &page.bookmarks {
                println!("{:>8}  {:<4} {}", card.id, card.score, card.title);
            }
        }
        Some(("nickname", sub)) => {
            let message = app.profile_editor().save_nickname(arg(sub, "name")?).await?;
            println!("{}", message);
        }
        Some(("avatar", sub)) => {
            let path = Path::new(arg(sub, "file")?);
            let bytes = std::fs::read(path)?;
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            let url = app.profile_editor().upload_avatar(&file_name, bytes).await?;
            println!("{}", url);
        }
        Some(("avatar-reset", _)) => {
            print_profile(&app.profile_editor().reset_avatar().await?);
        }
        Some(("oauth-url", sub)) => {
            let provider: OAuthProvider = arg(sub, "provider")?.parse()?;
            println!("{}", app.oauth_url(provider)?);
        }
        Some(("oauth-callback", sub)) => {
            let next = app.complete_oauth(arg(sub, "url")?).await?;
            println!("logged in, continue at {}", next);
        }
        _ => return Err(Error::general("unknown command")),
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cinevisor=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = cli().get_matches();
    if let Err(e) = run(matches).await {
        let notice = Notice::from(&e);
        eprintln!("{}", notice.message);
        if let Some(route) = notice.redirect {
            eprintln!("-> {}", route);
        }
        std::process::exit(1);
    }
}
