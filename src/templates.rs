use maud::{DOCTYPE, Markup, html};

use crate::entities::movie;

const TAILWIND_CDN: &str = "https://cdn.tailwindcss.com";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Nav {
    Home,
    About,
    Settings,
    Login,
    Other,
}

/// What every full page needs besides its own content.
#[derive(Debug, Default)]
pub struct PageContext {
    /// Display name of the admin account, shown in the header.
    pub owner: Option<String>,
    pub signed_in: bool,
    pub flashes: Vec<String>,
}

pub fn index_page(ctx: &PageContext, movies: &[movie::Model]) -> String {
    layout(
        ctx,
        Nav::Home,
        html! {
            p class="text-sm text-gray-600" { (movies.len()) " Titles" }

            @if ctx.signed_in {
                form method="post" {
                    div class="mt-4 flex flex-wrap items-center gap-2 text-sm text-gray-700" {
                        label for="title" { "Name" }
                        input class=(INPUT) type="text" name="title" id="title" autocomplete="off" maxlength="60" required;
                        label for="year" { "Year" }
                        input class=(INPUT) type="text" name="year" id="year" autocomplete="off" maxlength="4" required;
                        input class=(BUTTON) type="submit" name="submit" value="Add";
                    }
                }
            }

            ul class="mt-6 divide-y divide-gray-200" {
                @for movie in movies {
                    (movie_row(ctx, movie))
                }
            }
        },
    )
}

pub fn edit_page(ctx: &PageContext, movie: &movie::Model) -> String {
    layout(
        ctx,
        Nav::Other,
        html! {
            h3 class="text-lg font-semibold text-gray-900" { "Edit item" }
            form method="post" {
                div class="mt-4 flex flex-wrap items-center gap-2 text-sm text-gray-700" {
                    label for="title" { "Name" }
                    input class=(INPUT) type="text" name="title" id="title" autocomplete="off" maxlength="60" required value=(movie.title);
                    label for="year" { "Year" }
                    input class=(INPUT) type="text" name="year" id="year" autocomplete="off" maxlength="4" required value=(movie.year);
                    input class=(BUTTON) type="submit" name="submit" value="Update";
                }
            }
        },
    )
}

pub fn settings_page(ctx: &PageContext, name: &str) -> String {
    layout(
        ctx,
        Nav::Settings,
        html! {
            h3 class="text-lg font-semibold text-gray-900" { "Settings" }
            form method="post" {
                div class="mt-4 flex flex-wrap items-center gap-2 text-sm text-gray-700" {
                    label for="name" { "Your Name" }
                    input class=(INPUT) type="text" name="name" id="name" autocomplete="off" maxlength="20" required value=(name);
                    input class=(BUTTON) type="submit" name="submit" value="Save";
                }
            }
        },
    )
}

pub fn login_page(ctx: &PageContext) -> String {
    layout(
        ctx,
        Nav::Login,
        html! {
            h3 class="text-lg font-semibold text-gray-900" { "Login" }
            form method="post" {
                div class="mt-4 space-y-3 text-sm text-gray-700" {
                    div {
                        label class="block" for="username" { "Username" }
                        input class=(INPUT) type="text" name="username" id="username" required;
                    }
                    div {
                        label class="block" for="password" { "Password" }
                        input class=(INPUT) type="password" name="password" id="password" required;
                    }
                    input class=(BUTTON) type="submit" name="submit" value="Submit";
                }
            }
        },
    )
}

pub fn about_page(ctx: &PageContext) -> String {
    layout(
        ctx,
        Nav::About,
        html! {
            h3 class="text-lg font-semibold text-gray-900" { "About" }
            p class="mt-4 text-gray-700" {
                "A small personal list of movies worth watching. "
                "Anyone can browse it; only the owner can add, change or remove titles."
            }
        },
    )
}

/// Shared by the router fallback and every handler that looks up a missing row.
pub fn not_found_page() -> String {
    page(
        "404",
        html! {
            div class="min-h-screen bg-gray-50 flex items-center justify-center" {
                div class="max-w-xl w-full px-6" {
                    div class="bg-white shadow rounded-lg p-8 text-center" {
                        h1 class="text-2xl font-bold text-gray-900" { "Page Not Found - 404" }
                        a class="mt-6 inline-block text-blue-600 hover:text-blue-800" href="/" { "Go Back" }
                    }
                }
            }
        },
    )
}

pub fn error_page() -> String {
    page(
        "Error",
        html! {
            div class="min-h-screen bg-gray-50 flex items-center justify-center" {
                div class="max-w-xl w-full px-6" {
                    div class="bg-white shadow rounded-lg p-8" {
                        h1 class="text-2xl font-bold text-gray-900" { "Error" }
                        p class="mt-4 text-gray-700" { "Something went wrong. Please try again." }
                        a class="mt-6 inline-block text-blue-600 hover:text-blue-800" href="/" { "Back" }
                    }
                }
            }
        },
    )
}

const INPUT: &str = "rounded-md border border-gray-300 px-3 py-1 focus:border-blue-500 focus:outline-none focus:ring-1 focus:ring-blue-500";
const BUTTON: &str =
    "rounded-md bg-blue-600 px-3 py-1 font-semibold text-white hover:bg-blue-700 cursor-pointer";

fn layout(ctx: &PageContext, active: Nav, content: Markup) -> String {
    let heading = match &ctx.owner {
        Some(name) => format!("{name}'s Watchlist"),
        None => "Watchlist".to_string(),
    };

    page(
        &heading,
        html! {
            div class="min-h-screen bg-gray-50" {
                div class="max-w-2xl mx-auto px-6 py-12" {
                    h2 class="text-3xl font-bold text-gray-900" { (heading) }

                    nav class="mt-4 flex gap-4 border-b border-gray-200 pb-2 text-sm" {
                        (nav_link("/", "Home", active == Nav::Home))
                        (nav_link("/about", "About", active == Nav::About))
                        @if ctx.signed_in {
                            (nav_link("/settings", "Settings", active == Nav::Settings))
                            (nav_link("/logout", "Logout", false))
                        } @else {
                            (nav_link("/login", "Login", active == Nav::Login))
                        }
                    }

                    @for message in &ctx.flashes {
                        div class="mt-4 rounded-md border border-blue-200 bg-blue-50 px-4 py-2 text-sm text-blue-800" { (message) }
                    }

                    div class="mt-6 bg-white shadow rounded-lg p-8" { (content) }

                    footer class="mt-8 text-center text-xs text-gray-400" { "Watchlist" }
                }
            }
        },
    )
}

fn nav_link(href: &str, label: &str, active: bool) -> Markup {
    let class = if active {
        "font-semibold text-blue-700"
    } else {
        "text-gray-600 hover:text-gray-900"
    };
    html! { a class=(class) href=(href) { (label) } }
}

fn movie_row(ctx: &PageContext, movie: &movie::Model) -> Markup {
    let imdb = format!("https://www.imdb.com/find?q={}", urlencoding::encode(&movie.title));

    html! {
        li class="flex items-center justify-between gap-4 py-3" {
            span class="text-gray-900" { (movie.title) " - " (movie.year) }
            span class="flex items-center gap-2 text-sm" {
                @if ctx.signed_in {
                    a class="text-blue-600 hover:text-blue-800" href=(format!("/movie/edit/{}", movie.id)) { "Edit" }
                    form class="inline" method="post" action=(format!("/movie/delete/{}", movie.id)) {
                        input class="text-red-600 hover:text-red-800 cursor-pointer" type="submit" name="delete" value="Delete" onclick="return confirm('Are you sure?')";
                    }
                }
                a class="text-yellow-600 hover:text-yellow-800" href=(imdb) target="_blank" rel="noopener noreferrer" title="Find this movie on IMDb" { "IMDb" }
            }
        }
    }
}

fn page(title: &str, body: Markup) -> String {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                script src=(TAILWIND_CDN) {}
            }
            body { (body) }
        }
    }
    .into_string()
}
