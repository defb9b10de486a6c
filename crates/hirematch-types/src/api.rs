use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{AnonymousCv, ApplicationStatus, Cv, Job, Role, SwipeDirection, User};

// -- JWT Claims --

/// JWT claims issued at login and decoded by the auth middleware.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub email: String,
    pub role: Role,
    pub exp: usize,
}

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub user_type: String,
    pub company_name: Option<String>,
    pub designation: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub message: String,
    pub user_id: i64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MeResponse {
    pub user: User,
}

// -- CVs --

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CvFields {
    pub education: Option<String>,
    pub experience: Option<String>,
    pub skills: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCvResponse {
    pub message: String,
    pub cv_id: i64,
    pub unique_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CvResponse {
    pub cv: Cv,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CvListResponse {
    pub cvs: Vec<AnonymousCv>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SwipeRequest {
    pub cv_id: i64,
    /// Kept as text so an unknown value is reported as an invalid argument.
    pub direction: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwipeResponse {
    pub message: String,
    pub direction: SwipeDirection,
    #[serde(rename = "match")]
    pub matched: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<i64>,
}

// -- Jobs --

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateJobRequest {
    #[serde(default)]
    pub title: String,
    pub responsibilities: Option<String>,
    pub requirements: Option<String>,
    pub salary: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobResponse {
    pub message: String,
    pub job_id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JobListResponse {
    pub jobs: Vec<Job>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ApplyRequest {
    pub job_id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyResponse {
    pub message: String,
    pub application_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<i64>,
    /// Set when the application was stored but its conversation could not be opened.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// An applicant as the job's employer sees them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Applicant {
    pub id: i64,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
    pub unique_id: Option<String>,
    pub education: Option<String>,
    pub experience: Option<String>,
    pub skills: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApplicantsResponse {
    pub applications: Vec<Applicant>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// An application as the jobseeker who made it sees it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MyApplication {
    pub id: i64,
    pub job_id: i64,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
    pub title: String,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub salary: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MyApplicationsResponse {
    pub applications: Vec<MyApplication>,
}

// -- Conversations --

/// Employer-facing entry: the candidate is identified only by their CV `unique_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateConversation {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub unique_id: Option<String>,
}

/// Jobseeker-facing entry: employers are not anonymous.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployerConversation {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub full_name: String,
    pub email: String,
    pub company_name: Option<String>,
    pub designation: Option<String>,
}

// Employer is listed first so untagged decoding tries the stricter shape before
// falling back to the candidate entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConversationSummary {
    Employer(EmployerConversation),
    Candidate(CandidateConversation),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ConversationsResponse {
    pub conversations: Vec<ConversationSummary>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Sent,
    Received,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageView {
    pub id: i64,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub message_type: MessageType,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessagesResponse {
    pub messages: Vec<MessageView>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SendMessageRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageResponse {
    pub message: String,
    pub message_id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCountResponse {
    pub unread_count: i64,
}

// -- Generic --

#[derive(Debug, Serialize, Deserialize)]
pub struct Ack {
    pub message: String,
}

impl Ack {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
