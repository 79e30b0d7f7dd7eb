use api_types::{
    account::Account,
    analytics::{MonthlyAnalytics, YearlyAnalytics},
};
use engine::{FilteredView, PostSummary, engagement_rate};
use gramstats::RefreshOutcome;

pub fn accounts(accounts: &[Account], current: Option<&Account>) {
    if accounts.is_empty() {
        println!("no accounts");
        return;
    }
    for account in accounts {
        let marker = if current.is_some_and(|c| c.ig_user_id == account.ig_user_id) {
            "*"
        } else {
            " "
        };
        println!(
            "{marker} {:<20} @{:<20} {}",
            account.ig_user_id, account.username, account.name
        );
    }
}

pub fn yearly(report: &YearlyAnalytics) {
    println!(
        "account {} | posts {} | avg engagement {:.1}%",
        report.account_id, report.total_posts, report.avg_engagement_rate
    );
    println!(
        "{:<8} {:>10} {:>8} {:>8} {:>8} {:>8}",
        "month", "followers", "posts", "likes", "comments", "saved"
    );
    for stats in &report.monthly_stats {
        println!(
            "{:<8} {:>10} {:>8} {:>8} {:>8} {:>8}",
            stats.month,
            stats.followers_count,
            stats.media_count,
            stats.total_likes,
            stats.total_comments,
            stats.total_saved
        );
    }
}

pub fn monthly(report: &MonthlyAnalytics) {
    println!("account {} | {}", report.account_id, report.month);
    println!(
        "{:<10} {:>6} {:>10} {:>8} {:>8}",
        "date", "posts", "followers", "reach", "views"
    );
    for day in &report.daily_stats {
        println!(
            "{:<10} {:>6} {:>+10} {:>8} {:>8}",
            day.date.format("%Y-%m-%d"),
            day.posts_count,
            day.new_followers,
            day.reach,
            day.profile_views
        );
    }
}

pub fn posts(view: &FilteredView<'_>, filtered: bool) {
    for post in &view.items {
        println!(
            "{}  {:<15} {:>6} likes {:>5} comments {:>6.1}%  {}",
            post.timestamp.format("%Y-%m-%d %H:%M"),
            post.media_type.as_str(),
            post.like_count,
            post.comments_count,
            engagement_rate(post),
            post.permalink.as_deref().unwrap_or(&post.ig_media_id)
        );
    }

    let summary = PostSummary::from_posts(view.items.iter().copied());
    if filtered {
        println!(
            "{} of {} posts ({} hidden)",
            view.filtered_count, view.total, view.hidden_count
        );
    } else {
        println!("{} posts", view.total);
    }
    println!(
        "likes {} | comments {} | reach {} | views {} | avg engagement {:.1}%",
        summary.total_likes,
        summary.total_comments,
        summary.total_reach,
        summary.total_views,
        summary.avg_engagement_rate
    );
}

pub fn refresh(outcome: &RefreshOutcome) {
    match outcome {
        RefreshOutcome::Refreshed {
            new_accounts,
            updated_accounts,
            total_processed,
            message,
        } => {
            println!("{message}");
            println!(
                "processed {total_processed} | new {new_accounts} | updated {updated_accounts}"
            );
        }
        RefreshOutcome::Failed { message, errors } => {
            eprintln!("{message}");
            for error in errors {
                eprintln!("  - {error}");
            }
        }
    }
}
