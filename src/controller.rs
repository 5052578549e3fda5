//! Link creation
//!
//! Everything between pressing submit and seeing the new link in the list:
//! validate the fields, lock the form, create the link, show the outcome,
//! unlock the form.

use core::fmt;

use reqwest::StatusCode;

use crate::endpoint;
use crate::endpoint::Endpoint;
use crate::links::LinkRecord;
use crate::links::LinkRequest;
use crate::page::Notifier;
use crate::page::Page;
use crate::page::Validity;
use crate::presenter::Presenter;

/// Form fields that are validated before submitting
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    Destination,
    Expiry,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Field::Destination => f.write_str("destination"),
            Field::Expiry => f.write_str("expiry"),
        }
    }
}

/// Ways a submission can end without a new link
#[derive(Debug)]
pub enum Error {
    /// A field failed its constraints, nothing was sent
    Invalid { field: Field, validity: Validity },

    /// Another submission has the form locked
    InFlight,

    /// The endpoint answered with anything but `201 Created`
    Rejected { status: StatusCode, message: String },

    /// The request never got an answer
    Transport(endpoint::Error),

    /// The endpoint said `201 Created` but the body is not a link
    MalformedRecord(String),
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Transport(err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Invalid { field, validity } => write!(f, "Invalid {field}: {validity}"),
            Error::InFlight => f.write_str("A link is already being created"),
            Error::Rejected { status, message } => write!(f, "Rejected ({status}): {message}"),
            Error::Transport(err) => write!(f, "Could not create link: {err}"),
            Error::MalformedRecord(err) => write!(f, "Unexpected response: {err}"),
        }
    }
}

/// Drives a submission through the page
pub struct Controller<'p, N, E> {
    page: &'p Page<N>,
    endpoint: E,
    presenter: Presenter,
}

impl<'p, N, E> Controller<'p, N, E>
where
    N: Notifier,
    E: Endpoint,
{
    pub fn new(page: &'p Page<N>, endpoint: E) -> Self {
        Self {
            page,
            endpoint,
            presenter: Presenter::new(page.origin.clone()),
        }
    }

    /// Handle a submit event
    ///
    /// Invalid fields never reach the endpoint. Otherwise the submit control
    /// is disabled for exactly one round trip and enabled again however the
    /// round trip ends, also when this future is dropped halfway.
    pub async fn submit(&self) -> Result<(), Error> {
        if self.page.submit.is_disabled() {
            tracing::debug!("Submit ignored, a link is already being created");

            return Err(Error::InFlight);
        }

        let request = self.validate()?;

        let _lock = self.page.submit.lock();

        let result = self.create(&request).await;

        match &result {
            Err(Error::Rejected { message, .. }) => self.page.notifier.alert(message),
            Err(err @ (Error::Transport(_) | Error::MalformedRecord(_))) => {
                self.page.notifier.alert(&err.to_string());
            }
            _ => {}
        }

        result
    }

    /// Check both fields and build the request from them
    fn validate(&self) -> Result<LinkRequest, Error> {
        let destination = &self.page.destination;
        let expiry = &self.page.expiry;

        if let Err(validity) = destination.check_validity() {
            tracing::warn!("Invalid url: {validity}");

            return Err(Error::Invalid {
                field: Field::Destination,
                validity,
            });
        }

        if let Err(validity) = expiry.check_validity() {
            tracing::warn!("Invalid expiry datetime: {validity}");

            return Err(Error::Invalid {
                field: Field::Expiry,
                validity,
            });
        }

        let expires = expiry.value_as_number().ok_or(Error::Invalid {
            field: Field::Expiry,
            validity: Validity::BadInput,
        })?;

        Ok(LinkRequest {
            destination: destination.value(),
            expires,
        })
    }

    async fn create(&self, request: &LinkRequest) -> Result<(), Error> {
        tracing::debug!(
            r#"Creating link to "{}" expiring at {}"#,
            request.destination,
            request.expires
        );

        let response = self
            .endpoint
            .create(request)
            .await
            .map_err(Error::Transport)?;

        if response.status != StatusCode::CREATED {
            tracing::warn!("Link rejected with {}: {}", response.status, response.body);

            return Err(Error::Rejected {
                status: response.status,
                message: response.body,
            });
        }

        let record = serde_json::from_str::<LinkRecord>(&response.body)
            .map_err(|err| Error::MalformedRecord(err.to_string()))?;

        tracing::info!(r#"Created "/{}" for "{}""#, record.id, record.destination);

        self.presenter.render(&self.page.list, &record);

        Ok(())
    }
}
