//! Advisory prompt rendering
//!
//! Combines ticket fields, requester and group names, and the article's routing
//! rules into one fixed-template prompt. The template never branches on content.

use crate::routing::RoutingTable;
use crate::ticket::TicketInfo;

/// Render the prompt sent to the advisory model
///
/// Ends with a two-part question: who should own the ticket, and whom to
/// escalate to if escalation applies.
pub fn formulate_prompt(
    ticket: &TicketInfo,
    routing: &RoutingTable,
    requester_name: &str,
    group_name: &str,
) -> String {
    let tags = ticket.tags.join(", ");

    format!(
        "Requester: {requester}\n\
         Ticket Subject: {subject}\n\
         Ticket Description: {description}\n\
         Issue Type: {issue_type}\n\
         Tags: {tags}\n\
         Current Group: {group}\n\
         \n\
         The following is the routing information which includes scope responsibility \
         (e.g., L1, L2, BU, PS, Finance, Engineering, Collections):\n\
         {routing}\n\
         \n\
         Based on the information above, who should handle this ticket? \
         If escalation is required, to whom should it be escalated?",
        requester = requester_name,
        subject = ticket.subject,
        description = ticket.description,
        issue_type = ticket.issue_type,
        tags = tags,
        group = group_name,
        routing = routing,
    )
}
