//! HTML pages rendered by [`Render`](crate::render::Render).
//!
//! Each template receives its page data as JSON and decodes it into the
//! typed page struct before building the document.

use ironhtml::typed::{Document, Element};
use ironhtml_elements::{
    A, Body, Button, Code, Div, Form, H1, Head, Html, Li, Meta, Nav, P, Strong, Textarea, Title,
    Ul,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::guestbook::Greeting;
use crate::notes::Note;

pub const HOME: &str = "home";
pub const GUESTBOOK: &str = "guestbook";
pub const SIGNED: &str = "signed";

const NAV_LINKS: [(&str, &str); 3] = [
    ("/", "Home"),
    ("/guestbook", "Guestbook"),
    ("/storage", "Storage"),
];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HomePage {
    pub title: String,
    pub notes: Vec<Note>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GuestbookPage {
    pub greetings: Vec<Greeting>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SignedPage {
    pub content: String,
}

fn layout(title: &str, body: impl FnOnce(Element<Body>) -> Element<Body>) -> String {
    Document::new()
        .doctype()
        .root::<Html, _>(|html| {
            html.attr("lang", "en")
                .child::<Head, _>(|head| {
                    head.child::<Meta, _>(|m| m.attr("charset", "UTF-8"))
                        .child::<Title, _>(|t| t.text(title))
                })
                .child::<Body, _>(|b| {
                    let b = b.child::<Nav, _>(|nav| {
                        nav.child::<Ul, _>(|ul| {
                            ul.class("nav").children(NAV_LINKS, |(href, label), li: Element<Li>| {
                                li.child::<A, _>(|a| a.attr("href", href).text(label))
                            })
                        })
                    });
                    body(b)
                })
        })
        .build()
}

pub fn home(data: &Value) -> Result<String, serde_json::Error> {
    let page = HomePage::deserialize(data)?;
    Ok(layout(&page.title, |body| {
        let body = body.child::<H1, _>(|h| h.text(&page.title));
        if page.notes.is_empty() {
            return body.child::<P, _>(|p| p.class("empty").text("No notes yet."));
        }
        body.child::<Ul, _>(|ul| {
            ul.class("notes").children(page.notes.iter(), |note, li: Element<Li>| {
                let href = format!("/notes/{}", note.id);
                li.child::<A, _>(|a| a.attr("href", &href).text(format!("#{}", note.id)))
                .text(" ")
                .text(note.content.as_str())
            })
        })
    }))
}

pub fn guestbook(data: &Value) -> Result<String, serde_json::Error> {
    let page = GuestbookPage::deserialize(data)?;
    Ok(layout("Guestbook", |body| {
        let mut body = body.child::<H1, _>(|h| h.text("Guestbook"));
        for greeting in &page.greetings {
            body = body
                .child::<P, _>(|p| match &greeting.author {
                    Some(author) => p
                        .child::<Strong, _>(|s| s.text(author.as_str()))
                        .text(" wrote:"),
                    None => p.text("An anonymous person wrote:"),
                })
                .child::<Div, _>(|d| {
                    d.class("greeting")
                        .child::<Code, _>(|c| c.text(greeting.content.as_str()))
                });
        }
        body.child::<Form, _>(|form| {
            form.attr("action", "/guestbook/sign")
                .attr("method", "post")
                .child::<Div, _>(|d| {
                    d.child::<Textarea, _>(|t| {
                        t.attr("name", "content").attr("rows", "3").attr("cols", "60")
                    })
                })
                .child::<Div, _>(|d| {
                    d.child::<Button, _>(|b| b.attr("type", "submit").text("Sign Guestbook"))
                })
        })
    }))
}

pub fn signed(data: &Value) -> Result<String, serde_json::Error> {
    let page = SignedPage::deserialize(data)?;
    Ok(layout("Signed", |body| {
        body.child::<P, _>(|p| p.text("You wrote:"))
            .child::<Div, _>(|d| d.child::<Code, _>(|c| c.text(page.content.as_str())))
            .child::<P, _>(|p| p.child::<A, _>(|a| a.attr("href", "/guestbook").text("Back")))
    }))
}
