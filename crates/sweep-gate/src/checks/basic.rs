use std::future::Future;
use std::marker::PhantomData;

use async_trait::async_trait;

use crate::check::{Denial, EligibilityCheck};

/// Lets every item through.
pub struct AllowAll;

#[async_trait]
impl<I: Sync> EligibilityCheck<I> for AllowAll {
    fn name(&self) -> &str {
        "allow-all"
    }

    async fn check(&self, _item: &I) -> Result<(), Denial> {
        Ok(())
    }
}

/// Adapts an async closure into a check.
///
/// The closure receives a clone of the item and resolves to `Err(reason)`
/// to deny it.
pub struct FnCheck<I, F> {
    name: String,
    f: F,
    _item: PhantomData<fn(I)>,
}

impl<I, F, Fut> FnCheck<I, F>
where
    F: Fn(I) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), String>> + Send,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
            _item: PhantomData,
        }
    }
}

#[async_trait]
impl<I, F, Fut> EligibilityCheck<I> for FnCheck<I, F>
where
    I: Clone + Send + Sync,
    F: Fn(I) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), String>> + Send,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn check(&self, item: &I) -> Result<(), Denial> {
        (self.f)(item.clone())
            .await
            .map_err(|reason| Denial::new(self.name.as_str(), reason))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sweep_types::Resource;

    #[tokio::test]
    async fn allow_all_allows() {
        let check = AllowAll;
        assert!(EligibilityCheck::<Resource>::check(&check, &Resource::new("x"))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn fn_check_names_its_denials() {
        let check = FnCheck::new("not-default", |r: Resource| async move {
            if r.id.as_str() == "default" {
                Err("the default domain cannot be deleted".to_string())
            } else {
                Ok(())
            }
        });
        assert!(check.check(&Resource::new("d1")).await.is_ok());
        let denial = check.check(&Resource::new("default")).await.unwrap_err();
        assert_eq!(denial.check, "not-default");
        assert!(denial.reason.contains("default domain"));
    }
}
