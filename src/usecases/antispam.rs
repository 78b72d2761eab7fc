use std::time::Instant;

use crate::{
    app::config::SpamConfig,
    auth::rate_limit::CommentFloodLimiter,
    models::spam::SpamCheck,
    services::spam_filter::{SpamFilter, check_honeypot},
};

#[derive(Debug, Clone, Copy)]
pub struct AntiSpamInput<'a> {
    pub content: &'a str,
    pub honeypot: Option<&'a str>,
    pub ip_address: &'a str,
}

/// Ordered gate for public submissions: honeypot, then flood control, then
/// content. The first failing layer decides the reason.
#[derive(Debug, Default)]
pub struct AntiSpamService {
    filter: SpamFilter,
    flood: CommentFloodLimiter,
}

impl AntiSpamService {
    pub fn new(filter: SpamFilter, flood: CommentFloodLimiter) -> Self {
        Self { filter, flood }
    }

    pub fn from_config(config: &SpamConfig) -> Self {
        Self::new(
            SpamFilter::from_config(config),
            CommentFloodLimiter::from_config(config),
        )
    }

    pub fn check_anti_spam(&self, input: AntiSpamInput<'_>) -> SpamCheck {
        self.check_anti_spam_at(input, Instant::now())
    }

    pub fn check_anti_spam_at(&self, input: AntiSpamInput<'_>, now: Instant) -> SpamCheck {
        let honeypot = check_honeypot(input.honeypot);
        if !honeypot.pass {
            return honeypot;
        }

        let rate = self.flood.check_rate_limit_at(input.ip_address, now);
        if !rate.pass {
            return rate;
        }

        self.filter.filter_content(input.content)
    }

    pub fn flood_limiter(&self) -> &CommentFloodLimiter {
        &self.flood
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;
    use crate::models::spam::SpamReason;

    const IP: &str = "192.0.2.10";

    fn input<'a>(content: &'a str, honeypot: Option<&'a str>) -> AntiSpamInput<'a> {
        AntiSpamInput {
            content,
            honeypot,
            ip_address: IP,
        }
    }

    #[test]
    fn clean_submission_passes() {
        let service = AntiSpamService::default();
        assert_eq!(
            service.check_anti_spam(input("Great article, thanks!", None)),
            SpamCheck::passed()
        );
    }

    #[test]
    fn honeypot_wins_over_rate_limit_and_content() {
        let service = AntiSpamService::default();
        for _ in 0..5 {
            service.check_anti_spam(input("valid content", None));
        }

        let result = service.check_anti_spam(input("x", Some("bot")));
        assert_eq!(result, SpamCheck::rejected(SpamReason::Honeypot));
    }

    #[test]
    fn rate_limit_wins_over_content() {
        let service = AntiSpamService::default();
        for _ in 0..3 {
            assert!(service.check_anti_spam(input("valid content", None)).pass);
        }

        let result = service.check_anti_spam(input("x", None));
        assert_eq!(result, SpamCheck::rejected(SpamReason::RateLimit));
    }

    #[test]
    fn honeypot_rejection_does_not_consume_the_rate_window() {
        let service = AntiSpamService::new(
            SpamFilter::default(),
            CommentFloodLimiter::new(Duration::from_secs(60), 1),
        );
        service.check_anti_spam(input("valid content", Some("filled")));
        assert!(service.check_anti_spam(input("valid content", None)).pass);
    }

    #[test]
    fn content_reason_is_reported_last() {
        let service = AntiSpamService::default();
        let result = service.check_anti_spam(input("buy viagra", Some("  ")));
        assert_eq!(result, SpamCheck::rejected(SpamReason::ForbiddenWord));
    }

    #[test]
    fn reset_hook_reopens_the_window() {
        let service = AntiSpamService::default();
        for _ in 0..3 {
            service.check_anti_spam(input("valid content", None));
        }
        assert!(!service.check_anti_spam(input("valid content", None)).pass);

        service.flood_limiter().reset();
        assert!(service.check_anti_spam(input("valid content", None)).pass);
    }

    #[test]
    fn flood_window_reopens_after_sixty_seconds() {
        let service = AntiSpamService::default();
        let start = Instant::now();
        for _ in 0..3 {
            assert!(service.check_anti_spam_at(input("valid content", None), start).pass);
        }
        let midway = start + Duration::from_secs(30);
        assert_eq!(
            service.check_anti_spam_at(input("valid content", None), midway),
            SpamCheck::rejected(SpamReason::RateLimit)
        );

        let later = start + Duration::from_secs(61);
        assert!(service.check_anti_spam_at(input("valid content", None), later).pass);
    }
}
