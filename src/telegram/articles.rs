use std::sync::Arc;

use teloxide::{dispatching::UpdateHandler, dptree::case, filter_command, prelude::*};

use crate::{
    articles::{self, Article, CategoryFilter},
    profiles::Profile,
    tracker::Favorites,
};

use super::{Command, HandlerResult, render};

const FAVORITES: &str = "favorites";

fn favorite_articles(favorites: &Favorites) -> Vec<&'static Article> {
    favorites
        .ids()
        .iter()
        .filter_map(|id| articles::find(id))
        .collect()
}

async fn list_articles(
    bot: Bot,
    msg: Message,
    arg: String,
    profile: Arc<Profile>,
) -> HandlerResult {
    let tracker = profile.tracker.lock().await;
    let favorites = tracker.favorites();

    let text = if arg.trim().eq_ignore_ascii_case(FAVORITES) {
        let found = favorite_articles(favorites);
        if found.is_empty() {
            "No favourite articles yet. Open one with /article <id> and use /favorite <id>."
                .to_string()
        } else {
            render::article_list(&found, favorites)
        }
    } else {
        match arg.parse::<CategoryFilter>() {
            Ok(category) => render::article_list(&articles::filter(category, ""), favorites),
            Err(error) => error.to_string(),
        }
    };

    bot.send_message(msg.chat.id, text).await?;
    Ok(())
}

async fn search_articles(
    bot: Bot,
    msg: Message,
    arg: String,
    profile: Arc<Profile>,
) -> HandlerResult {
    let text = if arg.trim().is_empty() {
        "Usage: /search <term>, e.g. /search tidur".to_string()
    } else {
        let tracker = profile.tracker.lock().await;
        render::article_list(
            &articles::filter(CategoryFilter::All, &arg),
            tracker.favorites(),
        )
    };

    bot.send_message(msg.chat.id, text).await?;
    Ok(())
}

async fn read_article(
    bot: Bot,
    msg: Message,
    arg: String,
    profile: Arc<Profile>,
) -> HandlerResult {
    let text = match articles::find(&arg) {
        Some(article) => {
            let tracker = profile.tracker.lock().await;
            render::article(article, tracker.favorites().contains(article.id))
        }
        None => "Article not found. See /articles for the list.".to_string(),
    };

    bot.send_message(msg.chat.id, text).await?;
    Ok(())
}

async fn toggle_favorite(
    bot: Bot,
    msg: Message,
    arg: String,
    profile: Arc<Profile>,
) -> HandlerResult {
    let text = match articles::find(&arg) {
        Some(article) => {
            let is_favorite = profile
                .tracker
                .lock()
                .await
                .toggle_favorite(article.id)
                .await?;
            if is_favorite {
                format!("⭐ \"{}\" added to your favourites.", article.title)
            } else {
                format!("\"{}\" removed from your favourites.", article.title)
            }
        }
        None => "Article not found. See /articles for the list.".to_string(),
    };

    bot.send_message(msg.chat.id, text).await?;
    Ok(())
}

pub(super) fn schema() -> UpdateHandler<anyhow::Error> {
    Update::filter_message().branch(
        filter_command::<Command, _>()
            .branch(case![Command::Articles(arg)].endpoint(list_articles))
            .branch(case![Command::Search(arg)].endpoint(search_articles))
            .branch(case![Command::Article(arg)].endpoint(read_article))
            .branch(case![Command::Favorite(arg)].endpoint(toggle_favorite)),
    )
}
