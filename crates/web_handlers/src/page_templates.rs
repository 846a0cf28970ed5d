//! HTML rendering for the server-rendered pages.
//!
//! Pages are plain `format!` templates sharing one layout; every dynamic
//! value goes through [`html_escape`] on the way in.

use travel_services::types::{Destination, RegistrationWithTrip, TripDetails, TripSummary};

/// Escapes a string for safe interpolation into HTML.
pub fn html_escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Formats a price in cents as dollars, e.g. `$1499.00`.
pub fn format_price(cents: i64) -> String {
    format!("${}.{:02}", cents / 100, (cents % 100).abs())
}

fn nav(user_name: Option<&str>) -> String {
    match user_name {
        Some(name) => format!(
            r#"<nav>
    <a href="/">Destinations</a>
    <a href="/account">My Trips</a>
    <span class="nav-user">Signed in as {}</span>
    <form method="post" action="/logout" class="inline"><button type="submit">Log out</button></form>
</nav>"#,
            html_escape(name)
        ),
        None => r#"<nav>
    <a href="/">Destinations</a>
    <a href="/login">Log in</a>
    <a href="/signup">Sign up</a>
</nav>"#
            .to_string(),
    }
}

fn error_banner(error: Option<&str>) -> String {
    match error {
        Some(msg) => format!(r#"<div class="error">{}</div>"#, html_escape(msg)),
        None => String::new(),
    }
}

/// Wraps page content in the shared HTML shell.
pub fn layout(title: &str, user_name: Option<&str>, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title} - Travel Booking</title>
    <link rel="stylesheet" href="/static/styles.css">
</head>
<body>
    <header><h1><a href="/">Travel Booking</a></h1>{nav}</header>
    <main>
{body}
    </main>
</body>
</html>
"#,
        title = html_escape(title),
        nav = nav(user_name),
        body = body
    )
}

/// The destination catalog (home page).
pub fn destinations_page(
    destinations: &[Destination],
    user_name: Option<&str>,
    error: Option<&str>,
) -> String {
    let mut body = error_banner(error);
    body.push_str("<h2>Destinations</h2>\n");

    if destinations.is_empty() {
        body.push_str("<p>No destinations yet. Check back soon.</p>\n");
    } else {
        body.push_str("<ul class=\"cards\">\n");
        for destination in destinations {
            body.push_str(&format!(
                r#"<li class="card">
    <h3><a href="/destinations/{id}">{name}</a></h3>
    <p class="muted">{city}, {country}</p>
</li>
"#,
                id = destination.id,
                name = html_escape(&destination.name),
                city = html_escape(&destination.city),
                country = html_escape(&destination.country),
            ));
        }
        body.push_str("</ul>\n");
    }

    layout("Destinations", user_name, &body)
}

/// A destination with its scheduled trips.
pub fn destination_page(
    destination: &Destination,
    trips: &[TripSummary],
    user_name: Option<&str>,
) -> String {
    let mut body = format!(
        "<h2>{name}</h2>\n<p class=\"muted\">{city}, {country}</p>\n",
        name = html_escape(&destination.name),
        city = html_escape(&destination.city),
        country = html_escape(&destination.country),
    );

    if let Some(image_url) = &destination.image_url {
        body.push_str(&format!(
            r#"<img class="hero" src="{}" alt="{}">
"#,
            html_escape(image_url),
            html_escape(&destination.name)
        ));
    }

    if let Some(description) = &destination.description {
        body.push_str(&format!("<p>{}</p>\n", html_escape(description)));
    }

    body.push_str("<h3>Trips</h3>\n");
    if trips.is_empty() {
        body.push_str("<p>No trips scheduled for this destination.</p>\n");
    } else {
        body.push_str(
            "<table>\n<tr><th>Trip</th><th>Dates</th><th>Price</th><th>Seats left</th></tr>\n",
        );
        for trip in trips {
            body.push_str(&format!(
                "<tr><td><a href=\"/trips/{id}\">{name}</a></td><td>{start} to {end}</td><td>{price}</td><td>{seats}</td></tr>\n",
                id = trip.id,
                name = html_escape(&trip.name),
                start = trip.start_date,
                end = trip.end_date,
                price = format_price(trip.price_cents),
                seats = trip.seats_left,
            ));
        }
        body.push_str("</table>\n");
    }

    layout(&destination.name, user_name, &body)
}

/// A trip detail page with the registration form for signed-in users.
pub fn trip_page(details: &TripDetails, user_name: Option<&str>, error: Option<&str>) -> String {
    let trip = &details.trip;
    let mut body = error_banner(error);

    body.push_str(&format!(
        r#"<h2>{name}</h2>
<p class="muted"><a href="/destinations/{destination_id}">{destination}</a></p>
<p>{start} to {end} &middot; {price} per person &middot; {seats} of {capacity} seats left</p>
"#,
        name = html_escape(&trip.name),
        destination_id = trip.destination_id,
        destination = html_escape(&trip.destination_name),
        start = trip.start_date,
        end = trip.end_date,
        price = format_price(trip.price_cents),
        seats = trip.seats_left,
        capacity = trip.capacity,
    ));

    if !details.guides.is_empty() {
        body.push_str("<h3>Your guides</h3>\n<ul>\n");
        for guide in &details.guides {
            let bio = guide
                .bio
                .as_deref()
                .map(|b| format!(" &mdash; {}", html_escape(b)))
                .unwrap_or_default();
            body.push_str(&format!(
                "<li><strong>{}</strong>{}</li>\n",
                html_escape(&guide.name),
                bio
            ));
        }
        body.push_str("</ul>\n");
    }

    if user_name.is_some() {
        if trip.seats_left > 0 {
            body.push_str(&format!(
                r#"<h3>Register</h3>
<form method="post" action="/trips/{id}/register">
    <label for="participants">Participants</label>
    <input type="number" id="participants" name="participants" value="1" min="1" max="{seats}">
    <button type="submit">Register</button>
</form>
"#,
                id = trip.id,
                seats = trip.seats_left,
            ));
        } else {
            body.push_str("<p class=\"error\">This trip is fully booked.</p>\n");
        }
    } else {
        body.push_str("<p><a href=\"/login\">Log in</a> to register for this trip.</p>\n");
    }

    layout(&trip.name, user_name, &body)
}

/// The login form.
pub fn login_page(error: Option<&str>) -> String {
    let body = format!(
        r#"{error}<h2>Log in</h2>
<form method="post" action="/login">
    <label for="email">Email</label>
    <input type="email" id="email" name="email" required>
    <label for="password">Password</label>
    <input type="password" id="password" name="password" required>
    <button type="submit">Log in</button>
</form>
<p>No account yet? <a href="/signup">Sign up</a>.</p>
"#,
        error = error_banner(error)
    );

    layout("Log in", None, &body)
}

/// The signup form.
pub fn signup_page(error: Option<&str>) -> String {
    let body = format!(
        r#"{error}<h2>Sign up</h2>
<form method="post" action="/signup">
    <label for="name">Name</label>
    <input type="text" id="name" name="name" required>
    <label for="email">Email</label>
    <input type="email" id="email" name="email" required>
    <label for="password">Password</label>
    <input type="password" id="password" name="password" minlength="8" required>
    <button type="submit">Sign up</button>
</form>
<p>Already have an account? <a href="/login">Log in</a>.</p>
"#,
        error = error_banner(error)
    );

    layout("Sign up", None, &body)
}

/// The signed-in user's registrations.
pub fn account_page(
    user_name: &str,
    registrations: &[RegistrationWithTrip],
    error: Option<&str>,
) -> String {
    let mut body = error_banner(error);
    body.push_str("<h2>My Trips</h2>\n");

    if registrations.is_empty() {
        body.push_str("<p>You have no registrations yet. <a href=\"/\">Browse destinations</a>.</p>\n");
    } else {
        body.push_str(
            "<table>\n<tr><th>Trip</th><th>Destination</th><th>Dates</th><th>Participants</th><th>Total</th><th>Confirmation</th><th></th></tr>\n",
        );
        for registration in registrations {
            body.push_str(&format!(
                r#"<tr>
    <td><a href="/trips/{trip_id}">{trip}</a></td>
    <td>{destination}</td>
    <td>{start} to {end}</td>
    <td>{participants}</td>
    <td>{total}</td>
    <td><code>{code}</code></td>
    <td><form method="post" action="/registrations/{id}/cancel" class="inline"><button type="submit">Cancel</button></form></td>
</tr>
"#,
                trip_id = registration.trip_id,
                trip = html_escape(&registration.trip_name),
                destination = html_escape(&registration.destination_name),
                start = registration.start_date,
                end = registration.end_date,
                participants = registration.participants,
                total = format_price(registration.total_cents),
                code = html_escape(&registration.confirmation_code),
                id = registration.id,
            ));
        }
        body.push_str("</table>\n");
    }

    layout("My Trips", Some(user_name), &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape(r#"<script>alert("x&y")</script>"#),
            "&lt;script&gt;alert(&quot;x&amp;y&quot;)&lt;/script&gt;"
        );
        assert_eq!(html_escape("plain"), "plain");
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(149_900), "$1499.00");
        assert_eq!(format_price(5), "$0.05");
        assert_eq!(format_price(0), "$0.00");
    }

    #[test]
    fn test_destinations_page_escapes_names() {
        let destination = Destination {
            id: Uuid::new_v4(),
            name: "Fjords <3".to_string(),
            country: "Norway".to_string(),
            city: "Bergen".to_string(),
            description: None,
            image_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let html = destinations_page(std::slice::from_ref(&destination), None, None);
        assert!(html.contains("Fjords &lt;3"));
        assert!(!html.contains("Fjords <3"));
    }

    #[test]
    fn test_trip_page_shows_registration_form_when_signed_in() {
        let details = TripDetails {
            trip: TripSummary {
                id: Uuid::new_v4(),
                destination_id: Uuid::new_v4(),
                destination_name: "Bergen".to_string(),
                name: "Fjord cruise".to_string(),
                start_date: NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2026, 6, 8).unwrap(),
                price_cents: 99_900,
                capacity: 10,
                seats_taken: 4,
                seats_left: 6,
            },
            guides: vec![],
        };

        let signed_in = trip_page(&details, Some("Ada"), None);
        assert!(signed_in.contains("method=\"post\""));
        assert!(signed_in.contains("$999.00"));
        assert!(signed_in.contains("6 of 10 seats left"));

        let anonymous = trip_page(&details, None, None);
        assert!(anonymous.contains("Log in</a> to register"));
        assert!(!anonymous.contains("name=\"participants\""));
    }

    #[test]
    fn test_login_page_renders_error_banner() {
        let html = login_page(Some("Invalid email or password"));
        assert!(html.contains("class=\"error\""));
        assert!(html.contains("Invalid email or password"));

        let clean = login_page(None);
        assert!(!clean.contains("class=\"error\""));
    }
}
